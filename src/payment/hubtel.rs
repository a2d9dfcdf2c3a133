//! Hubtel checkout: backend-issued modal configuration, the hosted modal, and
//! recording of successful payments.

use super::preflight::{ensure_no_existing_access, normalized_buyer_phone};
use super::{PaymentOutcome, PaymentReceipt, PaymentSession, PaymentStrategy, RecordingStatus};
use crate::api::ApiClient;
use crate::api::payments::{HubtelCheckoutRecord, HubtelConfigRequest, HubtelConfigResponse};
use crate::core::reference::hubtel_reference;
use crate::entities::purchase::RecordedCheckout;
use crate::entities::{CheckoutPayload, PaymentMethod, PaymentOrder, ProviderResponse};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// The backend could not prepare the modal.
pub const INIT_FAILED_MESSAGE: &str = "Failed to initialize payment.";
/// The modal reported a failed payment.
pub const PAYMENT_FAILED_MESSAGE: &str = "Payment failed. Please try again.";
/// Charged, but the backend rejected the recording.
pub const RECORDING_FAILED_MESSAGE: &str =
    "Payment successful but recording failed. Please contact support.";
/// Charged, but the recording request did not complete.
pub const RECORDING_ERROR_MESSAGE: &str = "Payment successful but error recording transaction.";

/// Payment channels offered in the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HubtelChannel {
    /// Mobile money wallets
    MobileMoney,
    /// Debit and credit cards
    BankCard,
    /// Other digital wallets
    Wallets,
}

/// Channels every checkout offers.
pub const ALLOWED_CHANNELS: [HubtelChannel; 3] = [
    HubtelChannel::MobileMoney,
    HubtelChannel::BankCard,
    HubtelChannel::Wallets,
];

/// Purchase block the modal displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubtelPurchaseInfo {
    /// Amount in GHS
    pub amount: f64,
    /// Description shown in the modal
    pub purchase_description: String,
    /// Normalized `+233...` number
    pub customer_phone_number: String,
    /// Reference of this attempt
    pub client_reference: String,
}

/// Everything needed to open the Hubtel modal.
#[derive(Debug, Clone, PartialEq)]
pub struct HubtelModalRequest {
    /// Purchase block
    pub purchase_info: HubtelPurchaseInfo,
    /// Backend-issued configuration, passed through untouched
    pub config: Map<String, Value>,
    /// Channels the buyer may pick
    pub allowed_channels: Vec<HubtelChannel>,
    /// Show Hubtel branding
    pub branding_enabled: bool,
}

impl HubtelModalRequest {
    /// The `config` object the modal SDK expects: the backend configuration
    /// with branding and the allowed channels added.
    #[must_use]
    pub fn modal_config(&self) -> Value {
        let mut config = self.config.clone();
        let branding = if self.branding_enabled { "enabled" } else { "disabled" };
        config.insert("branding".to_string(), Value::from(branding));
        config.insert(
            "allowedChannels".to_string(),
            serde_json::to_value(&self.allowed_channels).unwrap_or_default(),
        );
        Value::Object(config)
    }
}

/// How the modal ended.
#[derive(Debug, Clone, PartialEq)]
pub enum HubtelCallback {
    /// The buyer was charged
    PaymentSucceeded(ProviderResponse),
    /// The provider declined or the buyer cancelled inside the modal
    PaymentFailed(ProviderResponse),
    /// Closed without a result
    Closed,
}

/// The hosted Hubtel modal. Implemented by the shell.
#[async_trait]
pub trait HubtelModal: Send + Sync {
    /// Opens the modal and waits until it reports a result or is closed.
    async fn open(&self, request: HubtelModalRequest) -> HubtelCallback;
}

/// [`PaymentStrategy`] for Hubtel.
pub struct HubtelStrategy {
    api: ApiClient,
    modal: Arc<dyn HubtelModal>,
}

impl HubtelStrategy {
    /// Strategy recording through `api` and paying through `modal`.
    #[must_use]
    pub fn new(api: ApiClient, modal: Arc<dyn HubtelModal>) -> Self {
        Self { api, modal }
    }

    /// Asks the backend for modal configuration.
    ///
    /// Returns `None`, after logging, when the call fails, answers non-OK, or
    /// carries no `config`.
    async fn request_config(
        &self,
        session: &PaymentSession,
        payload: &CheckoutPayload,
    ) -> Option<HubtelConfigResponse> {
        let request = HubtelConfigRequest {
            amount: session.amount,
            purchase_description: &session.description,
            customer_phone_number: &session.normalized_phone,
            client_reference: &session.client_reference,
            checkout_payload: payload,
        };

        let response = match self.api.create_hubtel_config(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Hubtel config request failed: {}", e);
                return None;
            }
        };
        if !response.is_success() {
            error!(
                "Hubtel config request returned {}: {}",
                response.status,
                response.message().unwrap_or("no message")
            );
            return None;
        }

        match response.decode::<HubtelConfigResponse>() {
            Ok(config) if config.config.is_some() => Some(config),
            Ok(_) => {
                error!("Hubtel config response has no config");
                None
            }
            Err(e) => {
                error!("Hubtel config response did not decode: {}", e);
                None
            }
        }
    }

    async fn record(
        &self,
        reference: &str,
        payload: &CheckoutPayload,
        payment_response: &ProviderResponse,
    ) -> RecordingStatus {
        let record = HubtelCheckoutRecord {
            client_reference: reference,
            checkout_payload: payload,
            payment_response,
        };
        match self.api.record_hubtel_checkout(&record).await {
            Ok(response) if response.is_success() => {
                info!("Recorded Hubtel checkout {}", reference);
                RecordingStatus::Recorded(response.decode().unwrap_or_else(|e| {
                    warn!("Unreadable Hubtel recording response: {}", e);
                    RecordedCheckout::default()
                }))
            }
            Ok(response) => {
                error!(
                    "Recording Hubtel checkout {} returned {}",
                    reference, response.status
                );
                RecordingStatus::Failed {
                    message: RECORDING_FAILED_MESSAGE.to_string(),
                }
            }
            Err(e) => {
                error!("Error recording Hubtel checkout {}: {}", reference, e);
                RecordingStatus::Failed {
                    message: RECORDING_ERROR_MESSAGE.to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl PaymentStrategy for HubtelStrategy {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Hubtel
    }

    #[instrument(skip_all, fields(method = "hubtel", amount = order.amount))]
    async fn initiate(&self, order: PaymentOrder) -> Result<PaymentOutcome> {
        let normalized_phone = normalized_buyer_phone(&order)?;
        ensure_no_existing_access(&self.api, &order).await?;

        let client_reference = hubtel_reference(
            order.reference_seed.as_deref(),
            Utc::now(),
            &mut rand::thread_rng(),
        );
        let mut session = PaymentSession {
            method: PaymentMethod::Hubtel,
            client_reference,
            amount: order.amount,
            description: order.description.clone(),
            normalized_phone,
        };

        let Some(response) = self.request_config(&session, &order.checkout_payload).await else {
            return Ok(PaymentOutcome::Failure {
                reason: INIT_FAILED_MESSAGE.to_string(),
            });
        };
        if let Some(server_reference) = response.client_reference.filter(|r| !r.is_empty()) {
            session.client_reference = server_reference;
        }

        info!("Opening Hubtel checkout {}", session.client_reference);
        let callback = self
            .modal
            .open(HubtelModalRequest {
                purchase_info: HubtelPurchaseInfo {
                    amount: session.amount,
                    purchase_description: session.description.clone(),
                    customer_phone_number: session.normalized_phone.clone(),
                    client_reference: session.client_reference.clone(),
                },
                config: response.config.unwrap_or_default(),
                allowed_channels: ALLOWED_CHANNELS.to_vec(),
                branding_enabled: true,
            })
            .await;

        match callback {
            HubtelCallback::PaymentSucceeded(provider_response) => {
                let recording = self
                    .record(
                        &session.client_reference,
                        &order.checkout_payload,
                        &provider_response,
                    )
                    .await;
                Ok(PaymentOutcome::Success(PaymentReceipt {
                    method: PaymentMethod::Hubtel,
                    reference: session.client_reference,
                    provider_response,
                    recording,
                }))
            }
            HubtelCallback::PaymentFailed(provider_response) => {
                warn!("Hubtel payment {} failed", session.client_reference);
                Ok(PaymentOutcome::Failure {
                    reason: provider_response
                        .message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| PAYMENT_FAILED_MESSAGE.to_string()),
                })
            }
            HubtelCallback::Closed => {
                info!("Hubtel checkout {} closed", session.client_reference);
                Ok(PaymentOutcome::Closed {
                    unresolved_reference: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{FakeHubtelModal, api_client_for, init_test_tracing, sample_order};
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn no_access(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/purchases/check-access");
            then.status(200).json_body(json!({ "hasAccess": false }));
        });
    }

    fn success_response() -> ProviderResponse {
        ProviderResponse {
            status: Some("Success".to_string()),
            ..ProviderResponse::default()
        }
    }

    #[tokio::test]
    async fn test_successful_payment_is_recorded_under_server_reference() -> Result<()> {
        init_test_tracing();
        let server = MockServer::start_async().await;
        no_access(&server);
        let config = server.mock(|when, then| {
            when.method(POST)
                .path("/payments/hubtel/config")
                .json_body_partial(r#"{ "customerPhoneNumber": "+233241234567" }"#);
            then.status(200).json_body(json!({
                "config": { "merchantAccount": 11684 },
                "clientReference": "SRV_REF"
            }));
        });
        let record = server.mock(|when, then| {
            when.method(POST)
                .path("/payments/hubtel/checkout")
                .json_body_partial(r#"{ "clientReference": "SRV_REF" }"#);
            then.status(200).json_body(json!({ "message": "Purchase recorded" }));
        });

        let modal = Arc::new(FakeHubtelModal::new(HubtelCallback::PaymentSucceeded(
            success_response(),
        )));
        let strategy = HubtelStrategy::new(api_client_for(&server), modal.clone());
        let outcome = strategy.initiate(sample_order()).await?;

        config.assert();
        record.assert();
        let PaymentOutcome::Success(receipt) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(receipt.reference, "SRV_REF");
        assert_eq!(receipt.recording.notice(), None);

        let opened = modal.requests();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].purchase_info.client_reference, "SRV_REF");
        let modal_config = opened[0].modal_config();
        assert_eq!(modal_config["merchantAccount"], json!(11684));
        assert_eq!(modal_config["branding"], json!("enabled"));
        assert_eq!(
            modal_config["allowedChannels"],
            json!(["mobileMoney", "bankCard", "wallets"])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_existing_access_stops_before_config() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/purchases/check-access");
            then.status(200).json_body(json!({ "hasAccess": true }));
        });
        let config = server.mock(|when, then| {
            when.method(POST).path("/payments/hubtel/config");
            then.status(200).json_body(json!({ "config": {} }));
        });

        let modal = Arc::new(FakeHubtelModal::new(HubtelCallback::Closed));
        let strategy = HubtelStrategy::new(api_client_for(&server), modal.clone());
        let result = strategy.initiate(sample_order()).await;

        assert!(matches!(result, Err(Error::AlreadyHasAccess { .. })));
        assert_eq!(config.hits(), 0);
        assert!(modal.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_config_failure_never_opens_modal() -> Result<()> {
        let server = MockServer::start_async().await;
        no_access(&server);
        server.mock(|when, then| {
            when.method(POST).path("/payments/hubtel/config");
            then.status(502).json_body(json!({ "message": "Bad gateway" }));
        });

        let modal = Arc::new(FakeHubtelModal::new(HubtelCallback::Closed));
        let strategy = HubtelStrategy::new(api_client_for(&server), modal.clone());
        let outcome = strategy.initiate(sample_order()).await?;

        assert_eq!(
            outcome,
            PaymentOutcome::Failure {
                reason: INIT_FAILED_MESSAGE.to_string()
            }
        );
        assert!(modal.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_config_without_config_field_is_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        no_access(&server);
        server.mock(|when, then| {
            when.method(POST).path("/payments/hubtel/config");
            then.status(200).json_body(json!({ "clientReference": "SRV_REF" }));
        });

        let modal = Arc::new(FakeHubtelModal::new(HubtelCallback::Closed));
        let strategy = HubtelStrategy::new(api_client_for(&server), modal.clone());
        let outcome = strategy.initiate(sample_order()).await?;

        assert!(matches!(outcome, PaymentOutcome::Failure { .. }));
        assert!(modal.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_phone_makes_no_requests() -> Result<()> {
        let server = MockServer::start_async().await;
        let check = server.mock(|when, then| {
            when.method(GET).path("/purchases/check-access");
            then.status(200).json_body(json!({ "hasAccess": false }));
        });

        let modal = Arc::new(FakeHubtelModal::new(HubtelCallback::Closed));
        let strategy = HubtelStrategy::new(api_client_for(&server), modal);
        let mut order = sample_order();
        order.buyer_phone = "12345".to_string();

        let result = strategy.initiate(order).await;
        assert!(matches!(result, Err(Error::InvalidPhoneNumber { .. })));
        assert_eq!(check.hits(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_recording_failure_still_reports_success() -> Result<()> {
        let server = MockServer::start_async().await;
        no_access(&server);
        server.mock(|when, then| {
            when.method(POST).path("/payments/hubtel/config");
            then.status(200).json_body(json!({ "config": {} }));
        });
        server.mock(|when, then| {
            when.method(POST).path("/payments/hubtel/checkout");
            then.status(500).json_body(json!({ "message": "db down" }));
        });

        let modal = Arc::new(FakeHubtelModal::new(HubtelCallback::PaymentSucceeded(
            success_response(),
        )));
        let strategy = HubtelStrategy::new(api_client_for(&server), modal);
        let outcome = strategy.initiate(sample_order()).await?;

        let PaymentOutcome::Success(receipt) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(receipt.recording.notice(), Some(RECORDING_FAILED_MESSAGE));
        assert!(receipt.reference.starts_with("FMT_"));
        Ok(())
    }

    #[tokio::test]
    async fn test_provider_failure_and_close() -> Result<()> {
        let server = MockServer::start_async().await;
        no_access(&server);
        server.mock(|when, then| {
            when.method(POST).path("/payments/hubtel/config");
            then.status(200).json_body(json!({ "config": {} }));
        });
        let api = api_client_for(&server);

        let declined = HubtelStrategy::new(
            api.clone(),
            Arc::new(FakeHubtelModal::new(HubtelCallback::PaymentFailed(
                ProviderResponse::default(),
            ))),
        );
        assert_eq!(
            declined.initiate(sample_order()).await?,
            PaymentOutcome::Failure {
                reason: PAYMENT_FAILED_MESSAGE.to_string()
            }
        );

        let closed = HubtelStrategy::new(api, Arc::new(FakeHubtelModal::new(HubtelCallback::Closed)));
        assert_eq!(
            closed.initiate(sample_order()).await?,
            PaymentOutcome::Closed {
                unresolved_reference: None
            }
        );
        Ok(())
    }
}
