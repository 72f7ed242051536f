//! Fixtures
//!
//! YAML-backed store data for demos and integration tests: settings,
//! menu and delivery zones for a named fixture set under `./fixtures`.

use std::{fs, path::PathBuf};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{AddonChoice, CartLine},
    error::ValidationError,
    menu::{Menu, MenuError},
    settings::{SettingsError, StoreSettings},
    zones::{DeliveryZones, ZoneError},
};

pub mod menu;
pub mod zones;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Store settings error
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Menu construction error
    #[error(transparent)]
    Menu(#[from] MenuError),

    /// Zone registry error
    #[error(transparent)]
    Zone(#[from] ZoneError),

    /// Wrapped input validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Product not found
    #[error("Product not found: {0}")]
    UnknownProduct(String),

    /// Add-on not found, or not available for the product
    #[error("Add-on not available: {0}")]
    UnknownAddon(String),
}

/// A loaded fixture set: settings, menu and zones for one demo store.
#[derive(Debug)]
pub struct Fixture<'a> {
    settings: StoreSettings,
    menu: Menu<'a>,
    zones: DeliveryZones<'a>,
}

impl<'a> Fixture<'a> {
    /// Load the fixture set with the given name from `./fixtures`.
    ///
    /// # Errors
    ///
    /// Returns a `FixtureError` if any of the set's files cannot be read
    /// or parsed.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_base_path(PathBuf::from("./fixtures").join(name))
    }

    /// Load a fixture set from an explicit directory.
    ///
    /// # Errors
    ///
    /// Returns a `FixtureError` if any of the set's files cannot be read
    /// or parsed.
    pub fn from_base_path(base_path: PathBuf) -> Result<Self, FixtureError> {
        let settings = StoreSettings::from_path(base_path.join("settings.yml"))?;
        let currency = settings.currency;

        let contents = fs::read_to_string(base_path.join("menu.yml"))?;
        let menu_fixture: menu::MenuFixture = serde_norway::from_str(&contents)?;
        let menu = menu_fixture.build(currency)?;

        let contents = fs::read_to_string(base_path.join("zones.yml"))?;
        let zones_fixture: zones::ZonesFixture = serde_norway::from_str(&contents)?;
        let zones = zones_fixture.build(currency)?;

        Ok(Fixture {
            settings,
            menu,
            zones,
        })
    }

    /// The store settings for this set.
    #[must_use]
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// The menu for this set.
    #[must_use]
    pub fn menu(&self) -> &Menu<'a> {
        &self.menu
    }

    /// The delivery zones for this set.
    #[must_use]
    pub fn zones(&self) -> &DeliveryZones<'a> {
        &self.zones
    }

    /// Build a cart line for a named product with named add-ons.
    ///
    /// # Errors
    ///
    /// Returns a `FixtureError` if the product is unknown, an add-on is
    /// unknown or not offered for the product, or the quantity is zero.
    pub fn cart_line(
        &self,
        product_name: &str,
        quantity: u32,
        addon_names: &[&str],
    ) -> Result<CartLine<'a>, FixtureError> {
        let key = self
            .menu
            .product_by_name(product_name)
            .ok_or_else(|| FixtureError::UnknownProduct(product_name.to_string()))?;
        let product = self
            .menu
            .product(key)
            .ok_or_else(|| FixtureError::UnknownProduct(product_name.to_string()))?;

        let mut addons = smallvec::SmallVec::new();

        for name in addon_names {
            let addon_key = self
                .menu
                .addon_by_name(name)
                .filter(|candidate| product.addons.contains(candidate))
                .ok_or_else(|| FixtureError::UnknownAddon((*name).to_string()))?;
            let addon = self
                .menu
                .addon(addon_key)
                .ok_or_else(|| FixtureError::UnknownAddon((*name).to_string()))?;

            addons.push(AddonChoice {
                addon: addon_key,
                name: addon.name.clone(),
                unit_price: addon.price,
            });
        }

        Ok(CartLine::new(
            key,
            product.name.clone(),
            product.price,
            quantity,
            addons,
        )?)
    }
}

/// Parse a major-unit price string like `"1500.00"` or `"NGN 1500.00"`
/// into money.
///
/// # Errors
///
/// Returns a `FixtureError` if the string is not a decimal number or
/// does not fit in minor units.
pub fn parse_price<'a>(
    price: &str,
    currency: &'static Currency,
) -> Result<Money<'a, Currency>, FixtureError> {
    let trimmed = price.trim();
    let trimmed = trimmed
        .strip_prefix(currency.iso_alpha_code)
        .map_or(trimmed, str::trim_start);

    let Ok(amount) = trimmed.parse::<Decimal>() else {
        return Err(FixtureError::InvalidPrice(price.to_string()));
    };

    let scale = Decimal::from(10i64.pow(currency.exponent));
    let minor = (amount * scale)
        .to_i64()
        .ok_or_else(|| FixtureError::InvalidPrice(price.to_string()))?;

    Ok(Money::from_minor(minor, currency))
}
