//! Bistro
//!
//! Bistro is a storefront ordering, pricing and subscription-billing engine for small food businesses, with `WhatsApp` order hand-off.

pub mod access;
pub mod cart;
pub mod checkout;
pub mod error;
pub mod fixtures;
pub mod menu;
pub mod message;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod settings;
pub mod subscription;
pub mod utils;
pub mod zones;
