//! Checkout Example
//!
//! This example loads a fixture store, prints its menu, builds a cart,
//! validates delivery details and composes the `WhatsApp` hand-off message
//! with a tracking link.
//!
//! Use `-f` to load a fixture set by name
//! Use `-q` to set the quantity of the first product

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;
use tabled::{Table, Tabled};

use bistro::{
    cart::Cart,
    checkout::{CheckoutForm, DeliveryType},
    fixtures::Fixture,
    message::{compose, format_amount, whatsapp_link},
    orders::{InMemoryOrderStore, place_order},
    pricing::OrderTotals,
    utils::DemoArgs,
};

#[derive(Tabled)]
struct MenuRow {
    name: String,
    price: String,
    addons: usize,
}

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = DemoArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let settings = fixture.settings();

    let rows: Vec<MenuRow> = fixture
        .menu()
        .products()
        .map(|(_, product)| MenuRow {
            name: product.name.clone(),
            price: format_amount(&product.price),
            addons: product.addons.len(),
        })
        .collect();

    println!("{} menu:\n{}\n", settings.name, Table::new(rows));

    let mut cart = Cart::new(settings.currency);
    cart.add_line(fixture.cart_line("Burger", args.quantity, &["Cheese"])?)?;
    cart.add_line(fixture.cart_line("Chapman", 1, &[])?)?;

    let zone = fixture
        .zones()
        .iter()
        .map(|(key, _)| key)
        .next()
        .ok_or_else(|| anyhow::anyhow!("fixture has no delivery zones"))?;

    let details = CheckoutForm {
        customer_name: "Ada Obi".to_string(),
        contact_number: "+2348098765432".to_string(),
        delivery_type: Some(DeliveryType::Delivery),
        street_address: Some("5 Marina Rd".to_string()),
        unit_number: Some("Apt 2".to_string()),
        zone: Some(zone),
    }
    .validate()?;

    let totals = OrderTotals::compute(
        &cart,
        &details.method,
        fixture.zones(),
        settings.pricing_policy(),
    )?;

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let snapshot = cart.clone();
    let mut store = InMemoryOrderStore::default();
    let token = place_order(&mut store, &mut cart, details.clone(), totals.clone(), now)?;
    let tracking_url = settings.tracking_url(token.as_str());

    let message = compose(&snapshot, &details, &totals, fixture.zones(), &tracking_url)?;

    println!("{message}");
    println!("Total charged: {}", format_amount(&totals.total));
    println!(
        "\nHand-off link:\n{}",
        whatsapp_link(&settings.whatsapp_number, &message)
    );

    Ok(())
}
