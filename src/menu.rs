//! Menu catalog
//!
//! Read-side projection of the store's menu: products and their optional
//! priced add-ons. Admin CRUD, categories and image uploads live with the
//! persistence collaborator; the cart only ever consumes this view.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::error::ValidationError;

slotmap::new_key_type! {
    /// Product Key
    pub struct ProductKey;

    /// Add-on Key
    pub struct AddonKey;
}

/// Errors related to catalog construction.
#[derive(Debug, Error)]
pub enum MenuError {
    /// A price's currency differs from the menu currency (price currency, menu currency).
    #[error("price has currency {0}, but menu has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// A product referenced an add-on key that is not in the catalog.
    #[error("unknown add-on key attached to product {0}")]
    UnknownAddon(String),

    /// Wrapped input validation error (negative price).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// An optional, priced modifier attached to a menu item.
#[derive(Debug, Clone)]
pub struct Addon<'a> {
    /// Add-on name
    pub name: String,

    /// Add-on unit price
    pub price: Money<'a, Currency>,
}

/// A menu item customers can add to a cart.
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Product unit price
    pub price: Money<'a, Currency>,

    /// Add-ons available for this product
    pub addons: Vec<AddonKey>,
}

/// The store's menu catalog.
#[derive(Debug)]
pub struct Menu<'a> {
    currency: &'static Currency,
    products: SlotMap<ProductKey, Product<'a>>,
    addons: SlotMap<AddonKey, Addon<'a>>,
    product_names: FxHashMap<String, ProductKey>,
    addon_names: FxHashMap<String, AddonKey>,
}

impl<'a> Menu<'a> {
    /// Create an empty menu priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Menu {
            currency,
            products: SlotMap::with_key(),
            addons: SlotMap::with_key(),
            product_names: FxHashMap::default(),
            addon_names: FxHashMap::default(),
        }
    }

    /// Register an add-on in the catalog.
    ///
    /// # Errors
    ///
    /// Returns a `MenuError` if the price is negative or in a different
    /// currency than the menu.
    pub fn add_addon(
        &mut self,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<AddonKey, MenuError> {
        self.check_price(&price)?;

        let name = name.into();
        let key = self.addons.insert(Addon {
            name: name.clone(),
            price,
        });
        self.addon_names.insert(name, key);

        Ok(key)
    }

    /// Register a product in the catalog, with the add-ons available for it.
    ///
    /// # Errors
    ///
    /// Returns a `MenuError` if the price is negative, in a different
    /// currency than the menu, or references an unknown add-on key.
    pub fn add_product(
        &mut self,
        name: impl Into<String>,
        price: Money<'a, Currency>,
        addons: impl Into<Vec<AddonKey>>,
    ) -> Result<ProductKey, MenuError> {
        self.check_price(&price)?;

        let name = name.into();
        let addons = addons.into();

        if addons.iter().any(|key| !self.addons.contains_key(*key)) {
            return Err(MenuError::UnknownAddon(name));
        }

        let key = self.products.insert(Product {
            name: name.clone(),
            price,
            addons,
        });
        self.product_names.insert(name, key);

        Ok(key)
    }

    /// Get a product by key.
    pub fn product(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Get an add-on by key.
    pub fn addon(&self, key: AddonKey) -> Option<&Addon<'a>> {
        self.addons.get(key)
    }

    /// Look up a product key by name.
    pub fn product_by_name(&self, name: &str) -> Option<ProductKey> {
        self.product_names.get(name).copied()
    }

    /// Look up an add-on key by name.
    pub fn addon_by_name(&self, name: &str) -> Option<AddonKey> {
        self.addon_names.get(name).copied()
    }

    /// Iterate over the products in the catalog.
    pub fn products(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.products.iter()
    }

    /// Get the number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency of the menu.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn check_price(&self, price: &Money<'a, Currency>) -> Result<(), MenuError> {
        if price.is_negative() {
            return Err(MenuError::Validation(ValidationError::NegativePrice));
        }

        if price.currency() == self.currency {
            Ok(())
        } else {
            Err(MenuError::CurrencyMismatch(
                price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }
}
