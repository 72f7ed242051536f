//! Zone fixture shapes

use serde::Deserialize;
use rusty_money::iso::Currency;

use crate::zones::DeliveryZones;

use super::{FixtureError, parse_price};

/// One zone entry in a zones fixture file.
#[derive(Debug, Deserialize)]
pub struct ZoneFixture {
    /// Zone name
    pub name: String,

    /// Major-unit fee string
    pub price: String,
}

/// The `zones.yml` file shape.
#[derive(Debug, Deserialize)]
pub struct ZonesFixture {
    /// Zone entries
    pub zones: Vec<ZoneFixture>,
}

impl ZonesFixture {
    /// Build a [`DeliveryZones`] registry from the fixture entries.
    ///
    /// # Errors
    ///
    /// Returns a `FixtureError` on bad fees.
    pub fn build<'a>(self, currency: &'static Currency) -> Result<DeliveryZones<'a>, FixtureError> {
        let mut zones = DeliveryZones::new(currency);

        for zone in self.zones {
            let price = parse_price(&zone.price, currency)?;
            zones.insert(zone.name, price)?;
        }

        Ok(zones)
    }
}
