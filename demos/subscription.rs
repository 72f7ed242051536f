//! Subscription Example
//!
//! This example walks a store's subscription through its lifecycle: trial
//! sign-up, a successful charge webhook, an expiry sweep and reactivation,
//! printing the admin access decision at each step.
//!
//! Run with: `cargo run --example subscription`

use anyhow::Result;

use bistro::{
    access::check_access,
    subscription::{
        BILLING_PERIOD_SECS, InMemorySubscriptionStore, PaymentEvent, SubscriptionEngine,
        SubscriptionStore,
    },
};

const DAY: u64 = 86_400;

const CHARGE_SUCCESS: &str = r#"{
    "event": "charge.success",
    "data": {
        "metadata": {
            "store_id": "naija-grill",
            "plan_id": "standard",
            "authorization_code": "AUTH_8dfhty",
            "customer_code": "CUS_xnxdt6s"
        }
    }
}"#;

/// Subscription Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let mut engine = SubscriptionEngine::new(InMemorySubscriptionStore::default());

    let trial = engine.start_trial("naija-grill", "standard", "owner@naijagrill.example", 0)?;
    println!(
        "day 0: trial starts, period ends at day {}",
        trial.current_period_end / DAY
    );
    report(&engine, 10 * DAY)?;

    let event = PaymentEvent::parse(CHARGE_SUCCESS)?
        .ok_or_else(|| anyhow::anyhow!("webhook event was dropped"))?;
    let outcome = engine.handle_event(&event, 20 * DAY)?;
    println!("day 20: {} handled, outcome {outcome:?}", event.name());
    report(&engine, 25 * DAY)?;

    let expired = engine.run_expiry_sweep(20 * DAY + BILLING_PERIOD_SECS + 1)?;
    println!("day 51: expiry sweep expired {expired} subscription(s)");
    report(&engine, 52 * DAY)?;

    let outcome = engine.handle_event(&event, 60 * DAY)?;
    println!("day 60: renewal payment, outcome {outcome:?}");
    report(&engine, 61 * DAY)?;

    Ok(())
}

#[expect(clippy::print_stdout, reason = "Example code")]
fn report(engine: &SubscriptionEngine<InMemorySubscriptionStore>, now: u64) -> Result<()> {
    let subscription = engine.store().get("naija-grill")?;
    let decision = check_access(subscription.as_ref(), now);

    println!(
        "  day {}: status {:?}, admin access {decision:?}",
        now / DAY,
        subscription.map(|sub| sub.status)
    );

    Ok(())
}
