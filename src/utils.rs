//! Utils

use clap::Parser;

/// Arguments for the storefront demos
#[derive(Debug, Parser)]
pub struct DemoArgs {
    /// Fixture set to use for the store
    #[clap(short, long, default_value = "naija-grill")]
    pub fixture: String,

    /// Quantity of the first product to order
    #[clap(short, long, default_value_t = 2)]
    pub quantity: u32,
}
