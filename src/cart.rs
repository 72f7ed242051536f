//! Cart
//!
//! In-memory, insertion-ordered collection of line items for one browsing
//! session. Mutations are serialized by the UI event loop; nothing here is
//! persisted until checkout.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    error::ValidationError,
    menu::{AddonKey, ProductKey},
};

/// Errors related to cart mutation.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line's currency differs from the cart currency (line currency, cart currency).
    #[error("line has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped input validation error.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// An add-on chosen for a cart line. Carries a snapshot of the add-on's
/// name and price so the line survives later catalog edits.
#[derive(Debug, Clone, PartialEq)]
pub struct AddonChoice<'a> {
    /// Key of the catalog add-on
    pub addon: AddonKey,

    /// Add-on name at the time it was chosen
    pub name: String,

    /// Add-on unit price at the time it was chosen
    pub unit_price: Money<'a, Currency>,
}

/// A product in the cart with a quantity and chosen add-ons.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    /// Key of the catalog product
    pub product: ProductKey,

    /// Product name at the time it was added
    pub name: String,

    /// Product unit price at the time it was added
    pub unit_price: Money<'a, Currency>,

    /// Quantity, always at least 1
    pub quantity: u32,

    /// Chosen add-ons, in selection order
    pub addons: SmallVec<[AddonChoice<'a>; 4]>,
}

impl<'a> CartLine<'a> {
    /// Create a new cart line.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the quantity is zero or the unit
    /// price is negative.
    pub fn new(
        product: ProductKey,
        name: impl Into<String>,
        unit_price: Money<'a, Currency>,
        quantity: u32,
        addons: impl Into<SmallVec<[AddonChoice<'a>; 4]>>,
    ) -> Result<Self, ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }

        if unit_price.is_negative() {
            return Err(ValidationError::NegativePrice);
        }

        Ok(CartLine {
            product,
            name: name.into(),
            unit_price,
            quantity,
            addons: addons.into(),
        })
    }

    /// The line's add-on identity: chosen keys, order-insensitive.
    ///
    /// Two lines for the same product merge exactly when this matches.
    #[must_use]
    pub fn addon_set(&self) -> SmallVec<[AddonKey; 4]> {
        let mut keys: SmallVec<[AddonKey; 4]> =
            self.addons.iter().map(|choice| choice.addon).collect();

        keys.sort_unstable();
        keys.dedup();

        keys
    }
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Add a line to the cart.
    ///
    /// If a line for the same product with an identical add-on set already
    /// exists, the quantities are merged; otherwise the line is appended,
    /// preserving insertion order.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the line's prices are not in the cart
    /// currency.
    pub fn add_line(&mut self, line: CartLine<'a>) -> Result<(), CartError> {
        self.check_currency(line.unit_price.currency())?;

        for choice in &line.addons {
            self.check_currency(choice.unit_price.currency())?;
        }

        let identity = line.addon_set();

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|existing| existing.product == line.product && existing.addon_set() == identity)
        {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }

        Ok(())
    }

    /// Remove every line for the given product. A no-op when the product
    /// is not in the cart.
    pub fn remove_product(&mut self, product: ProductKey) {
        self.lines.retain(|line| line.product != product);
    }

    /// Replace the quantity on every line for the given product.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the quantity is zero; the cart is
    /// left unchanged. Removal is an explicit operation, not a quantity of
    /// zero.
    pub fn update_quantity(&mut self, product: ProductKey, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::Validation(ValidationError::ZeroQuantity));
        }

        for line in self
            .lines
            .iter_mut()
            .filter(|line| line.product == product)
        {
            line.quantity = quantity;
        }

        Ok(())
    }

    /// Empty the cart. Used after a successful checkout.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn check_currency(&self, currency: &Currency) -> Result<(), CartError> {
        if currency == self.currency {
            Ok(())
        } else {
            Err(CartError::CurrencyMismatch(
                currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{NGN, USD},
    };
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    #[expect(clippy::unwrap_used, reason = "test fixture")]
    fn burger_line(quantity: u32, addons: SmallVec<[AddonChoice<'static>; 4]>) -> CartLine<'static> {
        CartLine::new(
            ProductKey::default(),
            "Burger",
            Money::from_minor(100_000, NGN),
            quantity,
            addons,
        )
        .unwrap()
    }

    fn cheese(key: AddonKey) -> AddonChoice<'static> {
        AddonChoice {
            addon: key,
            name: "Cheese".to_string(),
            unit_price: Money::from_minor(20_000, NGN),
        }
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let result = CartLine::new(
            ProductKey::default(),
            "Burger",
            Money::from_minor(100_000, NGN),
            0,
            SmallVec::new(),
        );

        assert_eq!(result, Err(ValidationError::ZeroQuantity));
    }

    #[test]
    fn same_product_and_addons_merge_quantities() -> TestResult {
        let mut cart = Cart::new(NGN);

        cart.add_line(burger_line(2, SmallVec::new()))?;
        cart.add_line(burger_line(3, SmallVec::new()))?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.iter().map(|line| line.quantity).sum::<u32>(), 5);

        Ok(())
    }

    #[test]
    fn addon_set_identity_ignores_selection_order() -> TestResult {
        let mut keys = slotmap::SlotMap::<AddonKey, ()>::with_key();
        let a = keys.insert(());
        let b = keys.insert(());

        let mut cart = Cart::new(NGN);
        cart.add_line(burger_line(1, smallvec![cheese(a), cheese(b)]))?;
        cart.add_line(burger_line(1, smallvec![cheese(b), cheese(a)]))?;

        assert_eq!(cart.len(), 1, "reordered add-on sets must merge");

        Ok(())
    }

    #[test]
    fn different_addon_sets_stay_separate() -> TestResult {
        let mut keys = slotmap::SlotMap::<AddonKey, ()>::with_key();
        let a = keys.insert(());

        let mut cart = Cart::new(NGN);
        cart.add_line(burger_line(1, SmallVec::new()))?;
        cart.add_line(burger_line(1, smallvec![cheese(a)]))?;

        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn update_quantity_zero_is_rejected_and_cart_unchanged() -> TestResult {
        let mut cart = Cart::new(NGN);
        let line = burger_line(2, SmallVec::new());
        let product = line.product;
        cart.add_line(line)?;

        let result = cart.update_quantity(product, 0);

        assert!(
            matches!(
                result,
                Err(CartError::Validation(ValidationError::ZeroQuantity))
            ),
            "expected ZeroQuantity, got {result:?}"
        );
        assert_eq!(
            cart.iter().map(|line| line.quantity).sum::<u32>(),
            2,
            "cart must be unchanged after a rejected update"
        );

        Ok(())
    }

    #[test]
    fn update_quantity_replaces_in_place() -> TestResult {
        let mut cart = Cart::new(NGN);
        let line = burger_line(2, SmallVec::new());
        let product = line.product;
        cart.add_line(line)?;

        cart.update_quantity(product, 7)?;

        assert_eq!(cart.iter().map(|line| line.quantity).sum::<u32>(), 7);

        Ok(())
    }

    #[test]
    fn remove_product_is_noop_when_absent() -> TestResult {
        let mut cart = Cart::new(NGN);
        cart.add_line(burger_line(1, SmallVec::new()))?;

        let mut keys = slotmap::SlotMap::<ProductKey, ()>::with_key();
        let absent = keys.insert(());
        cart.remove_product(absent);

        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn currency_mismatch_errors() {
        let mut cart = Cart::new(USD);

        let result = cart.add_line(burger_line(1, SmallVec::new()));

        assert!(
            matches!(result, Err(CartError::CurrencyMismatch("NGN", "USD"))),
            "expected CurrencyMismatch, got {result:?}"
        );
    }

    #[test]
    fn clear_empties_the_cart() -> TestResult {
        let mut cart = Cart::new(NGN);
        cart.add_line(burger_line(2, SmallVec::new()))?;

        cart.clear();

        assert!(cart.is_empty());

        Ok(())
    }
}
