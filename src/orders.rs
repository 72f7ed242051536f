//! Placed orders and tracking tokens
//!
//! Checkout snapshots the cart into a [`PlacedOrder`] and hands it to the
//! persistence collaborator through [`OrderStore`]. Each order gets an
//! opaque random tracking token with an expiry, so a customer can look up
//! order status without authenticating. Lookup makes no distinction
//! between an expired token and one that never existed.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{
    cart::{Cart, CartLine},
    checkout::CheckoutDetails,
    error::CollaboratorError,
    pricing::OrderTotals,
};

/// How long a tracking token stays valid.
pub const TRACKING_TOKEN_TTL_SECS: u64 = 7 * 86_400;

const TOKEN_BYTES: usize = 16;

/// An opaque, time-limited identifier for one order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingToken(String);

impl TrackingToken {
    /// Generate a fresh random token (32 hex characters).
    #[must_use]
    pub fn generate() -> Self {
        use rand::Rng;

        let bytes: [u8; TOKEN_BYTES] = rand::thread_rng().r#gen();
        let token = bytes.iter().map(|b| format!("{b:02x}")).collect();

        TrackingToken(token)
    }

    /// The token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of an order at the moment it was placed.
#[derive(Debug, Clone)]
pub struct PlacedOrder<'a> {
    /// Cart lines at checkout time
    pub lines: Vec<CartLine<'a>>,

    /// Validated customer and delivery details
    pub details: CheckoutDetails,

    /// Totals as presented to the customer
    pub totals: OrderTotals<'a>,

    /// When the order was placed (Unix seconds)
    pub placed_at: u64,
}

/// Storage operations for placed orders, injected at the checkout
/// boundary.
pub trait OrderStore<'a> {
    /// Persist an order under its tracking token.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` if the call fails.
    fn insert(
        &mut self,
        token: TrackingToken,
        order: PlacedOrder<'a>,
        expires_at: u64,
    ) -> Result<(), CollaboratorError>;

    /// Look up an order by token. Returns `None` for an invalid or
    /// expired token; the two are indistinguishable by design.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` if the call fails.
    fn lookup(&self, token: &str, now: u64) -> Result<Option<&PlacedOrder<'a>>, CollaboratorError>;
}

/// In-memory store for tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore<'a> {
    orders: FxHashMap<String, (u64, PlacedOrder<'a>)>,
}

impl<'a> OrderStore<'a> for InMemoryOrderStore<'a> {
    fn insert(
        &mut self,
        token: TrackingToken,
        order: PlacedOrder<'a>,
        expires_at: u64,
    ) -> Result<(), CollaboratorError> {
        self.orders.insert(token.0, (expires_at, order));

        Ok(())
    }

    fn lookup(&self, token: &str, now: u64) -> Result<Option<&PlacedOrder<'a>>, CollaboratorError> {
        Ok(self
            .orders
            .get(token)
            .filter(|(expires_at, _)| now <= *expires_at)
            .map(|(_, order)| order))
    }
}

/// Persist the cart as a placed order, clear the cart and return the
/// tracking token for the confirmation message.
///
/// # Errors
///
/// Returns a `CollaboratorError` if persisting fails; the cart is left
/// intact so the customer can retry.
pub fn place_order<'a, S: OrderStore<'a>>(
    store: &mut S,
    cart: &mut Cart<'a>,
    details: CheckoutDetails,
    totals: OrderTotals<'a>,
    now: u64,
) -> Result<TrackingToken, CollaboratorError> {
    let token = TrackingToken::generate();

    let order = PlacedOrder {
        lines: cart.iter().cloned().collect(),
        details,
        totals,
        placed_at: now,
    };

    store.insert(token.clone(), order, now + TRACKING_TOKEN_TTL_SECS)?;
    cart.clear();

    Ok(token)
}
