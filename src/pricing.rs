//! Pricing
//!
//! Pure order arithmetic: line totals, subtotals, delivery fees and the
//! final order total. All math runs in minor units and stays unrounded
//! until display; the only rounding point is the tax amount, which rounds
//! half-away-from-zero to the nearest minor unit.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    checkout::{DeliveryMethod, DeliveryType},
    error::ValidationError,
    zones::{DeliveryZones, ZoneKey},
};

/// Errors that can occur while pricing an order.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Wrapped input validation error (missing or unknown delivery zone).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Tax calculation overflowed or could not be safely represented.
    #[error("tax calculation overflowed or was not representable")]
    TaxConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Store-level pricing policy.
///
/// The canonical storefront applies no tax; a store that models one opts in
/// through its settings, and the rate then applies to the pre-delivery
/// subtotal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingPolicy {
    /// Optional tax rate applied to the pre-delivery subtotal.
    pub tax: Option<Percentage>,
}

/// Order-level totals, derived fresh from the cart on every render or
/// submit and never stored independently.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals<'a> {
    /// Sum of all line totals
    pub subtotal: Money<'a, Currency>,

    /// Delivery fee; zero for pickup
    pub delivery_fee: Money<'a, Currency>,

    /// Tax amount, present only when the store models tax
    pub tax: Option<Money<'a, Currency>>,

    /// Grand total
    pub total: Money<'a, Currency>,
}

impl<'a> OrderTotals<'a> {
    /// Compute all totals for a cart and validated delivery method.
    ///
    /// An empty cart prices to zero across the board, delivery fee
    /// included.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if the zone lookup fails or money
    /// arithmetic fails.
    pub fn compute(
        cart: &Cart<'a>,
        method: &DeliveryMethod,
        zones: &DeliveryZones<'a>,
        policy: PricingPolicy,
    ) -> Result<Self, PricingError> {
        let zero = Money::from_minor(0, cart.currency());

        if cart.is_empty() {
            return Ok(OrderTotals {
                subtotal: zero,
                delivery_fee: zero,
                tax: policy.tax.map(|_| zero),
                total: zero,
            });
        }

        let subtotal = order_subtotal(cart)?;
        let fee = delivery_fee(method.delivery_type(), method.zone(), zones)?;

        let tax = match policy.tax {
            Some(rate) => Some(tax_amount(&rate, &subtotal)?),
            None => None,
        };

        let total = order_total(subtotal, fee, tax)?;

        Ok(OrderTotals {
            subtotal,
            delivery_fee: fee,
            tax,
            total,
        })
    }
}

/// Calculate the total for a single cart line.
///
/// Add-on cost scales with the parent line's quantity, not per add-on
/// unit: `unit_price * qty + Σ addon_price * qty`.
///
/// # Errors
///
/// Returns a `PricingError` if an add-on's currency differs from the
/// line's.
pub fn line_total<'a>(line: &CartLine<'a>) -> Result<Money<'a, Currency>, PricingError> {
    let currency = line.unit_price.currency();
    let quantity = i64::from(line.quantity);

    let mut minor = line.unit_price.to_minor_units() * quantity;

    for choice in &line.addons {
        let addon_currency = choice.unit_price.currency();

        if addon_currency != currency {
            return Err(PricingError::Money(MoneyError::CurrencyMismatch {
                expected: currency.iso_alpha_code,
                actual: addon_currency.iso_alpha_code,
            }));
        }

        minor += choice.unit_price.to_minor_units() * quantity;
    }

    Ok(Money::from_minor(minor, currency))
}

/// Calculate the subtotal across all lines in a cart.
///
/// An empty cart subtotals to zero in the cart's currency. The sum is
/// order-independent.
///
/// # Errors
///
/// Returns a `PricingError` if any line total or money addition fails.
pub fn order_subtotal<'a>(cart: &Cart<'a>) -> Result<Money<'a, Currency>, PricingError> {
    let mut subtotal = Money::from_minor(0, cart.currency());

    for line in cart.iter() {
        subtotal = subtotal.add(line_total(line)?)?;
    }

    Ok(subtotal)
}

/// Calculate the delivery fee for the given delivery type and zone
/// selection.
///
/// Pickup is always free, whatever the zone selection. Delivery requires a
/// selected zone that still exists in the registry.
///
/// # Errors
///
/// - [`ValidationError::MissingDeliveryZone`]: delivery with no zone
///   selected.
/// - [`ValidationError::UnknownDeliveryZone`]: the selected key no longer
///   resolves.
pub fn delivery_fee<'a>(
    delivery_type: DeliveryType,
    zone: Option<ZoneKey>,
    zones: &DeliveryZones<'a>,
) -> Result<Money<'a, Currency>, PricingError> {
    match delivery_type {
        DeliveryType::Pickup => Ok(Money::from_minor(0, zones.currency())),
        DeliveryType::Delivery => {
            let key = zone.ok_or(ValidationError::MissingDeliveryZone)?;
            let zone = zones.get(key).ok_or(ValidationError::UnknownDeliveryZone)?;

            Ok(zone.price)
        }
    }
}

/// Combine subtotal, delivery fee and optional tax into the order total.
///
/// # Errors
///
/// Returns a `PricingError` if money addition fails (currency mismatch).
pub fn order_total<'a>(
    subtotal: Money<'a, Currency>,
    delivery_fee: Money<'a, Currency>,
    tax: Option<Money<'a, Currency>>,
) -> Result<Money<'a, Currency>, PricingError> {
    let mut total = subtotal.add(delivery_fee)?;

    if let Some(tax) = tax {
        total = total.add(tax)?;
    }

    Ok(total)
}

fn tax_amount<'a>(
    rate: &Percentage,
    subtotal: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = Decimal::from(subtotal.to_minor_units());
    let applied = *rate * minor;

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let Some(rounded) = rounded.to_i64() else {
        return Err(PricingError::TaxConversion);
    };

    Ok(Money::from_minor(rounded, subtotal.currency()))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::NGN;
    use smallvec::{SmallVec, smallvec};
    use testresult::TestResult;

    use crate::{
        cart::AddonChoice,
        menu::{AddonKey, ProductKey},
    };

    use super::*;

    fn cheese() -> AddonChoice<'static> {
        AddonChoice {
            addon: AddonKey::default(),
            name: "Cheese".to_string(),
            unit_price: Money::from_minor(20_000, NGN),
        }
    }

    #[expect(clippy::unwrap_used, reason = "test fixture")]
    fn burger(quantity: u32, addons: SmallVec<[AddonChoice<'static>; 4]>) -> CartLine<'static> {
        CartLine::new(
            ProductKey::default(),
            "Burger",
            Money::from_minor(100_000, NGN),
            quantity,
            addons,
        )
        .unwrap()
    }

    #[test]
    fn line_total_scales_addons_with_quantity() -> TestResult {
        let line = burger(2, smallvec![cheese()]);

        // 2 x 1000.00 + 2 x 200.00
        assert_eq!(line_total(&line)?, Money::from_minor(240_000, NGN));

        Ok(())
    }

    #[test]
    fn line_total_without_addons() -> TestResult {
        let line = burger(3, smallvec![]);

        assert_eq!(line_total(&line)?, Money::from_minor(300_000, NGN));

        Ok(())
    }

    #[test]
    fn line_total_rejects_mismatched_addon_currency() {
        let odd = AddonChoice {
            addon: AddonKey::default(),
            name: "Cheese".to_string(),
            unit_price: Money::from_minor(200, rusty_money::iso::USD),
        };
        let line = burger(1, smallvec![odd]);

        let result = line_total(&line);

        assert!(
            matches!(result, Err(PricingError::Money(_))),
            "expected money error, got {result:?}"
        );
    }

    #[test]
    fn subtotal_is_order_independent() -> TestResult {
        let mut forwards = Cart::new(NGN);
        forwards.add_line(burger(2, smallvec![cheese()]))?;
        forwards.add_line(burger(1, smallvec![]))?;

        let mut backwards = Cart::new(NGN);
        backwards.add_line(burger(1, smallvec![]))?;
        backwards.add_line(burger(2, smallvec![cheese()]))?;

        assert_eq!(order_subtotal(&forwards)?, order_subtotal(&backwards)?);

        Ok(())
    }

    #[test]
    fn empty_cart_subtotal_is_zero() -> TestResult {
        let cart = Cart::new(NGN);

        assert_eq!(order_subtotal(&cart)?, Money::from_minor(0, NGN));

        Ok(())
    }

    #[test]
    fn pickup_delivery_fee_is_zero_with_and_without_zone() -> TestResult {
        let mut zones = DeliveryZones::new(NGN);
        let lekki = zones.insert("Lekki", Money::from_minor(50_000, NGN))?;

        assert_eq!(
            delivery_fee(DeliveryType::Pickup, Some(lekki), &zones)?,
            Money::from_minor(0, NGN)
        );
        assert_eq!(
            delivery_fee(DeliveryType::Pickup, None, &zones)?,
            Money::from_minor(0, NGN)
        );

        Ok(())
    }

    #[test]
    fn delivery_without_zone_fails_validation() {
        let zones = DeliveryZones::new(NGN);

        let result = delivery_fee(DeliveryType::Delivery, None, &zones);

        assert!(
            matches!(
                result,
                Err(PricingError::Validation(
                    ValidationError::MissingDeliveryZone
                ))
            ),
            "expected MissingDeliveryZone, got {result:?}"
        );
    }

    #[test]
    fn delivery_with_stale_zone_key_fails_validation() -> TestResult {
        let mut other = DeliveryZones::new(NGN);
        let stale = other.insert("Lekki", Money::from_minor(50_000, NGN))?;

        let zones = DeliveryZones::new(NGN);
        let result = delivery_fee(DeliveryType::Delivery, Some(stale), &zones);

        assert!(
            matches!(
                result,
                Err(PricingError::Validation(
                    ValidationError::UnknownDeliveryZone
                ))
            ),
            "expected UnknownDeliveryZone, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn totals_for_delivery_order_without_tax() -> TestResult {
        let mut zones = DeliveryZones::new(NGN);
        let lekki = zones.insert("Lekki", Money::from_minor(50_000, NGN))?;

        let mut cart = Cart::new(NGN);
        cart.add_line(burger(2, smallvec![cheese()]))?;

        let method = DeliveryMethod::Delivery {
            zone: lekki,
            street_address: "5 Marina Rd".to_string(),
            unit_number: None,
        };

        let totals = OrderTotals::compute(&cart, &method, &zones, PricingPolicy::default())?;

        assert_eq!(totals.subtotal, Money::from_minor(240_000, NGN));
        assert_eq!(totals.delivery_fee, Money::from_minor(50_000, NGN));
        assert_eq!(totals.tax, None);
        assert_eq!(totals.total, Money::from_minor(290_000, NGN));

        Ok(())
    }

    #[test]
    fn tax_applies_to_pre_delivery_subtotal_only() -> TestResult {
        let mut zones = DeliveryZones::new(NGN);
        let lekki = zones.insert("Lekki", Money::from_minor(50_000, NGN))?;

        let mut cart = Cart::new(NGN);
        cart.add_line(burger(2, smallvec![]))?;

        let method = DeliveryMethod::Delivery {
            zone: lekki,
            street_address: "5 Marina Rd".to_string(),
            unit_number: None,
        };
        let policy = PricingPolicy {
            tax: Some(Percentage::from(0.03)),
        };

        let totals = OrderTotals::compute(&cart, &method, &zones, policy)?;

        // 3% of 2000.00, not of 2500.00
        assert_eq!(totals.tax, Some(Money::from_minor(6_000, NGN)));
        assert_eq!(totals.total, Money::from_minor(256_000, NGN));

        Ok(())
    }

    #[test]
    fn empty_cart_prices_to_zero_even_for_delivery() -> TestResult {
        let mut zones = DeliveryZones::new(NGN);
        let lekki = zones.insert("Lekki", Money::from_minor(50_000, NGN))?;

        let cart = Cart::new(NGN);
        let method = DeliveryMethod::Delivery {
            zone: lekki,
            street_address: "5 Marina Rd".to_string(),
            unit_number: None,
        };

        let totals = OrderTotals::compute(&cart, &method, &zones, PricingPolicy::default())?;

        assert_eq!(totals.total, Money::from_minor(0, NGN));
        assert_eq!(totals.delivery_fee, Money::from_minor(0, NGN));

        Ok(())
    }
}
