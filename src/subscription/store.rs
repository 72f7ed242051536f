//! Subscription storage seam
//!
//! The persistence collaborator is reached through [`SubscriptionStore`],
//! injected into the engine so tests and demos can run against the
//! in-memory implementation. Every mutation after creation goes through
//! [`SubscriptionStore::update_if`], a compare-and-swap on the status and
//! period-end the caller last read. Lookups are scoped by `store_id`, one
//! record per store.

use rustc_hash::FxHashMap;

use crate::error::CollaboratorError;

use super::{Subscription, SubscriptionStatus};

/// The pre-condition for a conditional update: the status and period-end
/// the caller read before computing its mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSnapshot {
    /// Expected current status
    pub status: SubscriptionStatus,

    /// Expected current period end (Unix seconds)
    pub current_period_end: u64,
}

/// Storage operations for subscription records.
///
/// Production implementations must make `update_if` atomic, for example
/// with `UPDATE ... WHERE status = $expected AND current_period_end =
/// $expected` and a row-count check.
pub trait SubscriptionStore {
    /// Get the subscription for a store, if one exists.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` if the call fails.
    fn get(&self, store_id: &str) -> Result<Option<Subscription>, CollaboratorError>;

    /// Insert a new subscription record.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` if the call fails.
    fn insert(&mut self, subscription: Subscription) -> Result<(), CollaboratorError>;

    /// Replace a store's subscription only if its stored state still
    /// matches `expected`. Returns `Ok(false)` when it does not; the
    /// caller decides how to report the conflict.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` if the call fails or the record is
    /// gone.
    fn update_if(
        &mut self,
        store_id: &str,
        expected: StateSnapshot,
        updated: Subscription,
    ) -> Result<bool, CollaboratorError>;

    /// List every subscription record, for the expiry sweep.
    ///
    /// # Errors
    ///
    /// Returns a `CollaboratorError` if the call fails.
    fn list(&self) -> Result<Vec<Subscription>, CollaboratorError>;
}

/// In-memory store for tests and demos.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    records: FxHashMap<String, Subscription>,
}

impl SubscriptionStore for InMemorySubscriptionStore {
    fn get(&self, store_id: &str) -> Result<Option<Subscription>, CollaboratorError> {
        Ok(self.records.get(store_id).cloned())
    }

    fn insert(&mut self, subscription: Subscription) -> Result<(), CollaboratorError> {
        self.records
            .insert(subscription.store_id.clone(), subscription);

        Ok(())
    }

    fn update_if(
        &mut self,
        store_id: &str,
        expected: StateSnapshot,
        updated: Subscription,
    ) -> Result<bool, CollaboratorError> {
        let Some(current) = self.records.get_mut(store_id) else {
            return Err(CollaboratorError::UnknownStore(store_id.to_string()));
        };

        if current.status != expected.status
            || current.current_period_end != expected.current_period_end
        {
            return Ok(false);
        }

        *current = updated;

        Ok(true)
    }

    fn list(&self) -> Result<Vec<Subscription>, CollaboratorError> {
        Ok(self.records.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn trial(store_id: &str) -> Subscription {
        Subscription {
            store_id: store_id.to_string(),
            plan_id: "standard".to_string(),
            status: SubscriptionStatus::Trial,
            current_period_start: 0,
            current_period_end: 100,
            billing_email: "owner@example.com".to_string(),
        }
    }

    #[test]
    fn update_if_applies_when_snapshot_matches() -> TestResult {
        let mut store = InMemorySubscriptionStore::default();
        let sub = trial("store-1");
        store.insert(sub.clone())?;

        let mut updated = sub.clone();
        updated.status = SubscriptionStatus::Active;

        let applied = store.update_if("store-1", sub.snapshot(), updated)?;

        assert!(applied, "matching snapshot must apply");
        assert_eq!(
            store.get("store-1")?.map(|s| s.status),
            Some(SubscriptionStatus::Active)
        );

        Ok(())
    }

    #[test]
    fn update_if_rejects_stale_snapshot() -> TestResult {
        let mut store = InMemorySubscriptionStore::default();
        let sub = trial("store-1");
        store.insert(sub.clone())?;

        let stale = StateSnapshot {
            status: SubscriptionStatus::Active,
            current_period_end: 999,
        };
        let mut updated = sub.clone();
        updated.status = SubscriptionStatus::Expired;

        let applied = store.update_if("store-1", stale, updated)?;

        assert!(!applied, "stale snapshot must be rejected");
        assert_eq!(
            store.get("store-1")?.map(|s| s.status),
            Some(SubscriptionStatus::Trial)
        );

        Ok(())
    }

    #[test]
    fn update_if_for_missing_record_errors() {
        let mut store = InMemorySubscriptionStore::default();

        let result = store.update_if("ghost", trial("ghost").snapshot(), trial("ghost"));

        assert!(
            matches!(result, Err(CollaboratorError::UnknownStore(_))),
            "expected UnknownStore, got {result:?}"
        );
    }
}
