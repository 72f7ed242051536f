//! Order message
//!
//! Formats a cart, checkout details and totals into the `WhatsApp` order
//! message. The receiving channel performs no parsing or validation, so
//! everything the store needs to fulfil the order has to be in this one
//! string, and all input validation happens before composing.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    cart::Cart,
    checkout::{CheckoutDetails, DeliveryMethod},
    error::ValidationError,
    pricing::{self, OrderTotals, PricingError},
    zones::DeliveryZones,
};

/// Errors that can occur while composing the order message.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Wrapped input validation error (stale zone key).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Wrapped pricing error from per-line amounts.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Format an amount for display.
///
/// Uses the currency's own formatting and trims a whole-unit `.00`, so
/// `₦400.00` renders as `₦400`. This is the only place amounts round.
#[must_use]
pub fn format_amount(amount: &Money<'_, Currency>) -> String {
    let formatted = amount.to_string();

    formatted
        .strip_suffix(".00")
        .map_or(formatted.clone(), ToString::to_string)
}

/// Compose the order message hand-off string.
///
/// Section order is fixed: line items, summary, customer, delivery,
/// tracking link. The delivery-fee line is omitted entirely for pickup,
/// and the tax line appears only when the totals carry one.
///
/// # Errors
///
/// Returns a `ComposeError` if the delivery zone no longer resolves or a
/// per-line amount cannot be computed.
pub fn compose(
    cart: &Cart<'_>,
    details: &CheckoutDetails,
    totals: &OrderTotals<'_>,
    zones: &DeliveryZones<'_>,
    tracking_url: &str,
) -> Result<String, ComposeError> {
    let mut out = String::new();

    out.push_str("*New Order*\n\n");

    for line in cart.iter() {
        out.push_str(&format!("{}x {}\n", line.quantity, line.name));

        for choice in &line.addons {
            let amount = Money::from_minor(
                choice.unit_price.to_minor_units() * i64::from(line.quantity),
                choice.unit_price.currency(),
            );
            out.push_str(&format!("  + {} ({})\n", choice.name, format_amount(&amount)));
        }
    }

    out.push_str(&format!("\n*Subtotal:* {}\n", format_amount(&totals.subtotal)));

    if details.method.delivery_type() == crate::checkout::DeliveryType::Delivery {
        out.push_str(&format!(
            "*Delivery Fee:* {}\n",
            format_amount(&totals.delivery_fee)
        ));
    }

    if let Some(tax) = &totals.tax {
        out.push_str(&format!("*Tax:* {}\n", format_amount(tax)));
    }

    out.push_str(&format!("*Total:* {}\n", format_amount(&totals.total)));

    out.push_str(&format!("\n*Customer:* {}\n", details.customer_name));
    out.push_str(&format!("*Contact:* {}\n", details.contact_number));

    match &details.method {
        DeliveryMethod::Pickup => {
            out.push_str("\n*Order Type:* Pickup\n");
        }
        DeliveryMethod::Delivery {
            zone,
            street_address,
            unit_number,
        } => {
            let zone = zones.get(*zone).ok_or(ValidationError::UnknownDeliveryZone)?;

            out.push_str("\n*Order Type:* Delivery\n");
            out.push_str(&format!("*Zone:* {}\n", zone.name));

            match unit_number {
                Some(unit) => {
                    out.push_str(&format!("*Address:* {street_address}, {unit}\n"));
                }
                None => {
                    out.push_str(&format!("*Address:* {street_address}\n"));
                }
            }
        }
    }

    out.push_str(&format!("\nTrack your order: {tracking_url}\n"));

    Ok(out)
}

/// Compose the message and the totals it reports in one step.
///
/// Convenience wrapper for callers that do not need the totals
/// separately.
///
/// # Errors
///
/// Returns a `ComposeError` if pricing or composing fails.
pub fn compose_with_totals<'a>(
    cart: &Cart<'a>,
    details: &CheckoutDetails,
    zones: &DeliveryZones<'a>,
    policy: pricing::PricingPolicy,
    tracking_url: &str,
) -> Result<(String, OrderTotals<'a>), ComposeError> {
    let totals = OrderTotals::compute(cart, &details.method, zones, policy)?;
    let message = compose(cart, details, &totals, zones, tracking_url)?;

    Ok((message, totals))
}

/// Build the `wa.me` hand-off link for a composed message.
///
/// The number keeps digits only (`+234 801...` becomes `234801...`) and
/// the message is URL-encoded into the `text` query parameter.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();

    format!("https://wa.me/{digits}?text={}", urlencoding::encode(message))
}
