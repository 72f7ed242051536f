//! Delivery zones
//!
//! Named geographic areas with a fixed delivery fee. Reference data managed
//! by the admin back office; the pricing engine only reads it.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::error::ValidationError;

slotmap::new_key_type! {
    /// Delivery Zone Key
    pub struct ZoneKey;
}

/// Errors related to zone registry construction.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// A fee's currency differs from the registry currency (fee currency, registry currency).
    #[error("zone fee has currency {0}, but registry has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped input validation error (negative fee).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A named geographic area with a fixed delivery fee.
#[derive(Debug, Clone)]
pub struct DeliveryZone<'a> {
    /// Zone name
    pub name: String,

    /// Flat delivery fee for the zone
    pub price: Money<'a, Currency>,
}

/// Registry of the store's delivery zones.
#[derive(Debug)]
pub struct DeliveryZones<'a> {
    currency: &'static Currency,
    zones: SlotMap<ZoneKey, DeliveryZone<'a>>,
    names: FxHashMap<String, ZoneKey>,
}

impl<'a> DeliveryZones<'a> {
    /// Create an empty registry priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        DeliveryZones {
            currency,
            zones: SlotMap::with_key(),
            names: FxHashMap::default(),
        }
    }

    /// Register a delivery zone.
    ///
    /// # Errors
    ///
    /// Returns a `ZoneError` if the fee is negative or in a different
    /// currency than the registry.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<ZoneKey, ZoneError> {
        if price.is_negative() {
            return Err(ZoneError::Validation(ValidationError::NegativePrice));
        }

        if price.currency() != self.currency {
            return Err(ZoneError::CurrencyMismatch(
                price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let name = name.into();
        let key = self.zones.insert(DeliveryZone {
            name: name.clone(),
            price,
        });
        self.names.insert(name, key);

        Ok(key)
    }

    /// Get a zone by key.
    pub fn get(&self, key: ZoneKey) -> Option<&DeliveryZone<'a>> {
        self.zones.get(key)
    }

    /// Look up a zone key by name.
    pub fn by_name(&self, name: &str) -> Option<ZoneKey> {
        self.names.get(name).copied()
    }

    /// Iterate over the zones in the registry.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneKey, &DeliveryZone<'a>)> {
        self.zones.iter()
    }

    /// Get the number of zones in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Get the currency of the registry.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{NGN, USD},
    };
    use testresult::TestResult;

    use super::*;

    #[test]
    fn insert_and_lookup() -> TestResult {
        let mut zones = DeliveryZones::new(NGN);

        let lekki = zones.insert("Lekki", Money::from_minor(50_000, NGN))?;

        assert_eq!(zones.by_name("Lekki"), Some(lekki));
        assert_eq!(
            zones.get(lekki).map(|zone| zone.price),
            Some(Money::from_minor(50_000, NGN))
        );
        assert_eq!(zones.len(), 1);

        Ok(())
    }

    #[test]
    fn currency_mismatch_errors() {
        let mut zones = DeliveryZones::new(NGN);

        let result = zones.insert("Lekki", Money::from_minor(500, USD));

        assert!(
            matches!(result, Err(ZoneError::CurrencyMismatch("USD", "NGN"))),
            "expected CurrencyMismatch, got {result:?}"
        );
    }

    #[test]
    fn negative_fee_errors() {
        let mut zones = DeliveryZones::new(NGN);

        let result = zones.insert("Lekki", Money::from_minor(-1, NGN));

        assert!(
            matches!(
                result,
                Err(ZoneError::Validation(ValidationError::NegativePrice))
            ),
            "expected NegativePrice, got {result:?}"
        );
    }
}
