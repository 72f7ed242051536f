//! Checkout details
//!
//! The checkout form arrives loosely typed from the UI. Validation happens
//! exhaustively here, once, producing [`CheckoutDetails`] whose delivery
//! variant can only hold the fields that variant requires. This is the
//! primary guard before the external messaging hand-off, which performs no
//! validation of its own.

use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, zones::ZoneKey};

/// How the customer wants to receive the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    /// Collected at the store; no zone, no address, no fee.
    Pickup,

    /// Delivered to an address inside a delivery zone.
    Delivery,
}

impl DeliveryType {
    /// Human-readable label used in the order message.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DeliveryType::Pickup => "Pickup",
            DeliveryType::Delivery => "Delivery",
        }
    }
}

/// Raw checkout input, as entered. Optional fields may or may not be
/// required depending on the delivery type; [`CheckoutForm::validate`]
/// decides.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    /// Customer name
    pub customer_name: String,

    /// Contact number for the messaging channel
    pub contact_number: String,

    /// Pickup or delivery
    pub delivery_type: Option<DeliveryType>,

    /// Street address, required for delivery
    pub street_address: Option<String>,

    /// Apartment or unit number, optional
    pub unit_number: Option<String>,

    /// Selected delivery zone, required for delivery
    pub zone: Option<ZoneKey>,
}

/// A validated delivery method. Pickup carries nothing; delivery always
/// carries a zone and street address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMethod {
    /// Collected at the store.
    Pickup,

    /// Delivered to an address inside a zone.
    Delivery {
        /// Selected delivery zone
        zone: ZoneKey,

        /// Street address
        street_address: String,

        /// Apartment or unit number
        unit_number: Option<String>,
    },
}

impl DeliveryMethod {
    /// The raw delivery type of this method.
    #[must_use]
    pub fn delivery_type(&self) -> DeliveryType {
        match self {
            DeliveryMethod::Pickup => DeliveryType::Pickup,
            DeliveryMethod::Delivery { .. } => DeliveryType::Delivery,
        }
    }

    /// The selected zone, when delivering.
    #[must_use]
    pub fn zone(&self) -> Option<ZoneKey> {
        match self {
            DeliveryMethod::Pickup => None,
            DeliveryMethod::Delivery { zone, .. } => Some(*zone),
        }
    }
}

/// Validated checkout details, ready for pricing and message composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutDetails {
    /// Customer name
    pub customer_name: String,

    /// Contact number for the messaging channel
    pub contact_number: String,

    /// Validated delivery method
    pub method: DeliveryMethod,
}

impl CheckoutForm {
    /// Validate the form into [`CheckoutDetails`].
    ///
    /// Name and contact number are always required. A zone and street
    /// address are required only for delivery; for pickup they are
    /// discarded. Whitespace-only input counts as missing. A form without
    /// a delivery type is treated as pickup, matching the storefront's
    /// default selection.
    ///
    /// # Errors
    ///
    /// Returns the first applicable [`ValidationError`].
    pub fn validate(self) -> Result<CheckoutDetails, ValidationError> {
        let customer_name = required(self.customer_name, ValidationError::MissingCustomerName)?;
        let contact_number = required(self.contact_number, ValidationError::MissingContactNumber)?;

        let method = match self.delivery_type.unwrap_or(DeliveryType::Pickup) {
            DeliveryType::Pickup => DeliveryMethod::Pickup,
            DeliveryType::Delivery => {
                let zone = self.zone.ok_or(ValidationError::MissingDeliveryZone)?;
                let street_address = required(
                    self.street_address.unwrap_or_default(),
                    ValidationError::MissingStreetAddress,
                )?;

                DeliveryMethod::Delivery {
                    zone,
                    street_address,
                    unit_number: self.unit_number.and_then(optional),
                }
            }
        };

        Ok(CheckoutDetails {
            customer_name,
            contact_number,
            method,
        })
    }
}

fn required(value: String, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        Err(error)
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
