//! Shared error taxonomy
//!
//! Three families of failure cross module boundaries: invalid user input
//! ([`ValidationError`]), failures from an external collaborator
//! ([`CollaboratorError`]) and optimistic-update conflicts on subscription
//! state ([`StateConflictError`]). Module-level error enums wrap these where
//! they need to add context.

use thiserror::Error;

/// Missing or invalid user input, reported inline at the boundary where it
/// was entered. Never fatal to the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Quantities below one are rejected before they reach the cart.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Catalog and cart prices must be zero or greater.
    #[error("price must not be negative")]
    NegativePrice,

    /// A customer name is always required at checkout.
    #[error("customer name is required")]
    MissingCustomerName,

    /// A contact number is always required at checkout.
    #[error("contact number is required")]
    MissingContactNumber,

    /// Delivery orders must select a delivery zone.
    #[error("a delivery zone must be selected for delivery orders")]
    MissingDeliveryZone,

    /// Delivery orders must carry a street address.
    #[error("a street address is required for delivery orders")]
    MissingStreetAddress,

    /// The selected zone key no longer resolves against the zone registry.
    #[error("the selected delivery zone no longer exists")]
    UnknownDeliveryZone,
}

/// A failure reported by an external collaborator (persistence, auth,
/// storage or webhook delivery). Logged and surfaced as a generic notice;
/// the operation is abandoned, never retried automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The persistence collaborator failed to complete a call.
    #[error("storage collaborator failure: {0}")]
    Store(String),

    /// A webhook referenced a store with no subscription record. The
    /// handler fails closed and mutates nothing.
    #[error("no subscription record for store {0}")]
    UnknownStore(String),
}

/// A conditional subscription update found different state than the caller
/// read. Reported via log only; this originates from asynchronous webhook
/// delivery and has no user-facing surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("subscription for store {store_id} changed before the update could apply")]
pub struct StateConflictError {
    /// Store whose subscription was being updated.
    pub store_id: String,
}
