//! Bistro prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    access::{AccessDecision, DenyReason, check_access, is_access_allowed},
    cart::{AddonChoice, Cart, CartError, CartLine},
    checkout::{CheckoutDetails, CheckoutForm, DeliveryMethod, DeliveryType},
    error::{CollaboratorError, StateConflictError, ValidationError},
    fixtures::{Fixture, FixtureError},
    menu::{Addon, AddonKey, Menu, MenuError, Product, ProductKey},
    message::{ComposeError, compose, compose_with_totals, format_amount, whatsapp_link},
    orders::{InMemoryOrderStore, OrderStore, PlacedOrder, TrackingToken, place_order},
    pricing::{OrderTotals, PricingError, PricingPolicy},
    settings::{SettingsError, StoreSettings},
    subscription::{
        BILLING_PERIOD_SECS, EventOutcome, Subscription, SubscriptionEngine, SubscriptionError,
        SubscriptionStatus,
        event::{EventParseError, PaymentEvent, PaymentMetadata},
        store::{InMemorySubscriptionStore, StateSnapshot, SubscriptionStore},
    },
    zones::{DeliveryZone, DeliveryZones, ZoneError, ZoneKey},
};
