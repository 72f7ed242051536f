//! Subscription lifecycle
//!
//! Tracks a store's billing status (trial, active, expired) driven by
//! payment-webhook events and a scheduled expiry sweep. The two triggers
//! can race, so every mutation is a conditional update against the state
//! the engine read; a lost race is logged and dropped rather than applied
//! over fresher data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{CollaboratorError, StateConflictError};

pub mod event;
pub mod store;

pub use event::{PaymentEvent, PaymentMetadata};
pub use store::{InMemorySubscriptionStore, StateSnapshot, SubscriptionStore};

/// Length of both the trial and each paid billing period.
pub const BILLING_PERIOD_SECS: u64 = 30 * 86_400;

/// Errors that can occur while driving the subscription lifecycle.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Wrapped collaborator failure (store call failed, unknown store).
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// Wrapped optimistic-update conflict.
    #[error(transparent)]
    Conflict(#[from] StateConflictError),
}

/// Subscription lifecycle states gating admin access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// First 30 days after the store subscribed, before any payment.
    Trial,

    /// A payment succeeded for the current period.
    Active,

    /// The period lapsed or a payment failed. Re-enterable: a fresh
    /// successful payment activates again.
    Expired,
}

impl SubscriptionStatus {
    /// String form used in storage and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
        }
    }
}

/// A store's subscription record. Looked up by `store_id`, one record per
/// store; the billing email is contact metadata, never an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Store this subscription belongs to
    pub store_id: String,

    /// Subscribed plan
    pub plan_id: String,

    /// Lifecycle status
    pub status: SubscriptionStatus,

    /// Current period start (Unix seconds)
    pub current_period_start: u64,

    /// Current period end (Unix seconds)
    pub current_period_end: u64,

    /// Billing contact email
    pub billing_email: String,
}

impl Subscription {
    /// Whether `now` falls inside the current period.
    #[must_use]
    pub fn is_within_period(&self, now: u64) -> bool {
        now <= self.current_period_end
    }

    /// The state snapshot used as the pre-condition for conditional
    /// updates.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            status: self.status,
            current_period_end: self.current_period_end,
        }
    }
}

/// Outcome of handling one webhook event or sweep entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The subscription moved to `Active` with a fresh period.
    Activated,

    /// The subscription moved to `Expired`.
    Expired,

    /// The event did not apply to the subscription's current state.
    Ignored,

    /// The stored state changed between read and write; nothing applied.
    Conflict,
}

/// Drives subscription state from webhook events and expiry sweeps.
///
/// The store handle is constructor-injected so callers can substitute a
/// test double for the persistence collaborator.
#[derive(Debug)]
pub struct SubscriptionEngine<S: SubscriptionStore> {
    store: S,
}

impl<S: SubscriptionStore> SubscriptionEngine<S> {
    /// Create a new engine over the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a trial subscription for a store.
    ///
    /// Idempotent: when the store already has a subscription, the existing
    /// record is returned untouched; a repeat subscribe attempt never
    /// resets anyone's period.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` if the store call fails.
    pub fn start_trial(
        &mut self,
        store_id: &str,
        plan_id: &str,
        billing_email: &str,
        now: u64,
    ) -> Result<Subscription, CollaboratorError> {
        if let Some(existing) = self.store.get(store_id)? {
            return Ok(existing);
        }

        let subscription = Subscription {
            store_id: store_id.to_string(),
            plan_id: plan_id.to_string(),
            status: SubscriptionStatus::Trial,
            current_period_start: now,
            current_period_end: now + BILLING_PERIOD_SECS,
            billing_email: billing_email.to_string(),
        };

        self.store.insert(subscription.clone())?;

        tracing::info!(
            target: "bistro::subscription",
            store_id = %store_id,
            plan_id = %plan_id,
            "trial started"
        );

        Ok(subscription)
    }

    /// Apply a payment-webhook event.
    ///
    /// `charge.success` activates the subscription with a fresh 30-day
    /// period from the event time, from any state. `charge.failed`
    /// expires an active subscription immediately; against any other
    /// state it is ignored, so a late-arriving failure cannot resurrect
    /// or re-expire anything. A webhook naming a store with no
    /// subscription record fails closed: the error is reported and no
    /// state is touched.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` for store failures or an unknown
    /// store id. Conditional-update conflicts are logged and reported as
    /// [`EventOutcome::Conflict`], not as errors.
    pub fn handle_event(
        &mut self,
        event: &PaymentEvent,
        now: u64,
    ) -> Result<EventOutcome, SubscriptionError> {
        let store_id = &event.metadata().store_id;

        let Some(current) = self.store.get(store_id)? else {
            tracing::warn!(
                target: "bistro::subscription",
                store_id = %store_id,
                event = event.name(),
                "webhook for unknown store; failing closed"
            );
            return Err(CollaboratorError::UnknownStore(store_id.clone()).into());
        };

        match event {
            PaymentEvent::ChargeSucceeded(metadata) => {
                let mut updated = current.clone();
                updated.plan_id = metadata.plan_id.clone();
                updated.status = SubscriptionStatus::Active;
                updated.current_period_start = now;
                updated.current_period_end = now + BILLING_PERIOD_SECS;

                self.apply(&current, updated, EventOutcome::Activated)
            }
            PaymentEvent::ChargeFailed(_) => {
                if current.status != SubscriptionStatus::Active {
                    tracing::info!(
                        target: "bistro::subscription",
                        store_id = %store_id,
                        status = current.status.as_str(),
                        "charge.failed ignored for non-active subscription"
                    );
                    return Ok(EventOutcome::Ignored);
                }

                let mut updated = current.clone();
                updated.status = SubscriptionStatus::Expired;

                self.apply(&current, updated, EventOutcome::Expired)
            }
        }
    }

    /// Expire every active subscription whose period has lapsed.
    ///
    /// Returns the number of subscriptions expired. A subscription
    /// renewed between the sweep's read and write loses nothing: the
    /// conditional update detects the conflict and the sweep moves on.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` if listing or updating fails.
    pub fn run_expiry_sweep(&mut self, now: u64) -> Result<usize, SubscriptionError> {
        let lapsed: Vec<Subscription> = self
            .store
            .list()?
            .into_iter()
            .filter(|sub| {
                sub.status == SubscriptionStatus::Active && !sub.is_within_period(now)
            })
            .collect();

        let mut expired = 0;

        for current in lapsed {
            let mut updated = current.clone();
            updated.status = SubscriptionStatus::Expired;

            if self.apply(&current, updated, EventOutcome::Expired)? == EventOutcome::Expired {
                expired += 1;
            }
        }

        Ok(expired)
    }

    fn apply(
        &mut self,
        current: &Subscription,
        updated: Subscription,
        outcome: EventOutcome,
    ) -> Result<EventOutcome, SubscriptionError> {
        let applied =
            self.store
                .update_if(&current.store_id, current.snapshot(), updated)?;

        if applied {
            Ok(outcome)
        } else {
            let conflict = StateConflictError {
                store_id: current.store_id.clone(),
            };
            tracing::warn!(
                target: "bistro::subscription",
                store_id = %current.store_id,
                error = %conflict,
                "conditional update lost the race; dropping stale mutation"
            );

            Ok(EventOutcome::Conflict)
        }
    }
}
