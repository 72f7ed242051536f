//! Admin access gating
//!
//! The entire admin surface is gated on the store's subscription. When
//! access is denied the admin UI renders a blocking renewal notice and
//! nothing else; partial admin content is never shown.
//!
//! Trial subscriptions are allowed in: a trial that cannot reach the
//! admin screens would be no trial at all. Expired subscriptions and
//! lapsed periods always deny.

use crate::subscription::{Subscription, SubscriptionStatus};

/// Why admin access was denied, for the renewal notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The store has no subscription record at all.
    NoSubscription,

    /// The subscription is expired.
    Expired,

    /// The status allows access but the current period has lapsed and no
    /// sweep or webhook has caught up yet.
    PeriodLapsed,
}

/// The gate's verdict for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Render the admin surface.
    Allowed,

    /// Render the blocking renewal notice instead.
    Denied(DenyReason),
}

impl AccessDecision {
    /// Whether the admin surface may render.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }
}

/// Whether a subscription grants admin access at `now`.
///
/// True iff the status is `Active` or `Trial` and `now` is within the
/// current period.
#[must_use]
pub fn is_access_allowed(subscription: &Subscription, now: u64) -> bool {
    check_access(Some(subscription), now).is_allowed()
}

/// Gate the admin surface, with a reason usable by the renewal notice.
#[must_use]
pub fn check_access(subscription: Option<&Subscription>, now: u64) -> AccessDecision {
    let Some(subscription) = subscription else {
        return AccessDecision::Denied(DenyReason::NoSubscription);
    };

    match subscription.status {
        SubscriptionStatus::Expired => AccessDecision::Denied(DenyReason::Expired),
        SubscriptionStatus::Active | SubscriptionStatus::Trial => {
            if subscription.is_within_period(now) {
                AccessDecision::Allowed
            } else {
                AccessDecision::Denied(DenyReason::PeriodLapsed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;

    fn subscription(status: SubscriptionStatus) -> Subscription {
        Subscription {
            store_id: "store-1".to_string(),
            plan_id: "standard".to_string(),
            status,
            current_period_start: 0,
            current_period_end: 30 * DAY,
            billing_email: "owner@example.com".to_string(),
        }
    }

    #[test]
    fn active_within_period_is_allowed() {
        let sub = subscription(SubscriptionStatus::Active);

        assert!(is_access_allowed(&sub, 10 * DAY));
    }

    #[test]
    fn trial_within_period_is_allowed() {
        let sub = subscription(SubscriptionStatus::Trial);

        assert!(is_access_allowed(&sub, 10 * DAY));
    }

    #[test]
    fn expired_is_denied_even_within_period() {
        let sub = subscription(SubscriptionStatus::Expired);

        assert_eq!(
            check_access(Some(&sub), 10 * DAY),
            AccessDecision::Denied(DenyReason::Expired)
        );
    }

    #[test]
    fn active_past_period_end_is_denied() {
        let sub = subscription(SubscriptionStatus::Active);

        assert_eq!(
            check_access(Some(&sub), 31 * DAY),
            AccessDecision::Denied(DenyReason::PeriodLapsed)
        );
    }

    #[test]
    fn missing_subscription_is_denied() {
        assert_eq!(
            check_access(None, 0),
            AccessDecision::Denied(DenyReason::NoSubscription)
        );
    }
}
