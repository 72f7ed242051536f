//! Menu fixture shapes

use serde::Deserialize;
use rusty_money::iso::Currency;

use crate::menu::Menu;

use super::{FixtureError, parse_price};

/// One add-on entry in a menu fixture file.
#[derive(Debug, Deserialize)]
pub struct AddonFixture {
    /// Add-on name
    pub name: String,

    /// Major-unit price string
    pub price: String,
}

/// One product entry in a menu fixture file.
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Major-unit price string
    pub price: String,

    /// Names of add-ons offered for this product
    #[serde(default)]
    pub addons: Vec<String>,
}

/// The `menu.yml` file shape.
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Add-on entries
    #[serde(default)]
    pub addons: Vec<AddonFixture>,

    /// Product entries
    pub products: Vec<ProductFixture>,
}

impl MenuFixture {
    /// Build a [`Menu`] from the fixture entries.
    ///
    /// # Errors
    ///
    /// Returns a `FixtureError` on bad prices or unknown add-on names.
    pub fn build<'a>(self, currency: &'static Currency) -> Result<Menu<'a>, FixtureError> {
        let mut menu = Menu::new(currency);

        for addon in self.addons {
            let price = parse_price(&addon.price, currency)?;
            menu.add_addon(addon.name, price)?;
        }

        for product in self.products {
            let price = parse_price(&product.price, currency)?;

            let mut addon_keys = Vec::with_capacity(product.addons.len());
            for name in &product.addons {
                let key = menu
                    .addon_by_name(name)
                    .ok_or_else(|| FixtureError::UnknownAddon(name.clone()))?;
                addon_keys.push(key);
            }

            menu.add_product(product.name, price, addon_keys)?;
        }

        Ok(menu)
    }
}
