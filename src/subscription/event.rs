//! Payment webhook events
//!
//! The payment gateway delivers `charge.success` and `charge.failed`
//! events as JSON, with the store and plan carried in the charge
//! metadata. Everything else the gateway sends is ignored.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while parsing a webhook payload.
#[derive(Debug, Error)]
pub enum EventParseError {
    /// The payload was not valid JSON or was missing required fields.
    #[error("malformed webhook payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Charge metadata attached to payment events.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentMetadata {
    /// Store the charge was made for
    pub store_id: String,

    /// Plan the charge pays for
    pub plan_id: String,

    /// Gateway authorization code for recurring charges
    #[serde(default)]
    pub authorization_code: Option<String>,

    /// Gateway customer code
    #[serde(default)]
    pub customer_code: Option<String>,
}

/// A payment event the subscription lifecycle reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// A charge settled; the subscription renews.
    ChargeSucceeded(PaymentMetadata),

    /// A charge failed; an active subscription expires.
    ChargeFailed(PaymentMetadata),
}

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    event: String,
    data: WebhookData,
}

#[derive(Debug, Deserialize)]
struct WebhookData {
    metadata: PaymentMetadata,
}

impl PaymentEvent {
    /// Parse a raw webhook body.
    ///
    /// Returns `Ok(None)` for event types the lifecycle does not consume;
    /// those are logged and dropped, not errors.
    ///
    /// # Errors
    ///
    /// Returns an `EventParseError` if the body is not valid JSON or a
    /// consumed event is missing its metadata.
    pub fn parse(body: &str) -> Result<Option<Self>, EventParseError> {
        let payload: WebhookPayload = serde_json::from_str(body)?;

        match payload.event.as_str() {
            "charge.success" => Ok(Some(PaymentEvent::ChargeSucceeded(payload.data.metadata))),
            "charge.failed" => Ok(Some(PaymentEvent::ChargeFailed(payload.data.metadata))),
            other => {
                tracing::info!(
                    target: "bistro::subscription",
                    event = %other,
                    "ignoring unconsumed webhook event type"
                );
                Ok(None)
            }
        }
    }

    /// The gateway's name for this event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PaymentEvent::ChargeSucceeded(_) => "charge.success",
            PaymentEvent::ChargeFailed(_) => "charge.failed",
        }
    }

    /// The charge metadata for this event.
    #[must_use]
    pub fn metadata(&self) -> &PaymentMetadata {
        match self {
            PaymentEvent::ChargeSucceeded(metadata) | PaymentEvent::ChargeFailed(metadata) => {
                metadata
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_charge_success() -> TestResult {
        let body = r#"{
            "event": "charge.success",
            "data": {
                "metadata": {
                    "store_id": "store-1",
                    "plan_id": "standard",
                    "authorization_code": "AUTH_abc",
                    "customer_code": "CUS_abc"
                }
            }
        }"#;

        let event = PaymentEvent::parse(body)?;

        match event {
            Some(PaymentEvent::ChargeSucceeded(metadata)) => {
                assert_eq!(metadata.store_id, "store-1");
                assert_eq!(metadata.plan_id, "standard");
                assert_eq!(metadata.authorization_code.as_deref(), Some("AUTH_abc"));
            }
            other => panic!("expected ChargeSucceeded, got {other:?}"),
        }

        Ok(())
    }

    #[test]
    fn parses_charge_failed_without_codes() -> TestResult {
        let body = r#"{
            "event": "charge.failed",
            "data": {
                "metadata": { "store_id": "store-1", "plan_id": "standard" }
            }
        }"#;

        let event = PaymentEvent::parse(body)?;

        assert!(
            matches!(event, Some(PaymentEvent::ChargeFailed(_))),
            "expected ChargeFailed, got {event:?}"
        );

        Ok(())
    }

    #[test]
    fn unconsumed_event_types_are_dropped() -> TestResult {
        let body = r#"{
            "event": "transfer.success",
            "data": {
                "metadata": { "store_id": "store-1", "plan_id": "standard" }
            }
        }"#;

        assert_eq!(PaymentEvent::parse(body)?, None);

        Ok(())
    }

    #[test]
    fn malformed_json_errors() {
        let result = PaymentEvent::parse("not json");

        assert!(
            matches!(result, Err(EventParseError::Malformed(_))),
            "expected Malformed, got {result:?}"
        );
    }
}
