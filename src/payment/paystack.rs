//! Paystack checkout: the inline popup followed by backend verification.

use super::preflight::{ensure_no_existing_access, normalized_buyer_phone};
use super::verification::{PaymentVerification, VerificationPrompt};
use super::{PaymentOutcome, PaymentStrategy};
use crate::api::ApiClient;
use crate::config::PaymentsConfig;
use crate::core::checkout::CURRENCY;
use crate::core::reference::paystack_reference;
use crate::entities::{PaymentMethod, PaymentOrder, ProviderResponse};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Payment channels offered in the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaystackChannel {
    /// Mobile money wallets
    MobileMoney,
    /// Debit and credit cards
    Card,
}

/// Channels every checkout offers.
pub const ALLOWED_CHANNELS: [PaystackChannel; 2] =
    [PaystackChannel::MobileMoney, PaystackChannel::Card];

/// One entry of `metadata.custom_fields`, shown on the Paystack dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaystackCustomField {
    /// Label on the dashboard
    pub display_name: String,
    /// Field key
    pub variable_name: String,
    /// Field value
    pub value: String,
}

/// Buyer details attached to the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaystackMetadata {
    /// Buyer full name
    pub name: String,
    /// Normalized buyer number
    pub phone: String,
    /// Name and phone again, as dashboard fields
    pub custom_fields: Vec<PaystackCustomField>,
}

impl PaystackMetadata {
    fn new(name: &str, phone: &str) -> Self {
        let field = |display: &str, variable: &str, value: &str| PaystackCustomField {
            display_name: display.to_string(),
            variable_name: variable.to_string(),
            value: value.to_string(),
        };
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            custom_fields: vec![
                field("Name", "name", name),
                field("Phone", "phone", phone),
            ],
        }
    }
}

/// Setup handed to the Paystack inline popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaystackSetup {
    /// Merchant public key
    #[serde(rename = "key")]
    pub public_key: String,
    /// Reference of this attempt
    #[serde(rename = "ref")]
    pub reference: String,
    /// Buyer email; receipts go here
    pub email: String,
    /// Minor currency units (pesewas)
    pub amount: u64,
    /// Always `GHS`
    pub currency: String,
    /// Channels the buyer may pick
    pub channels: Vec<PaystackChannel>,
    /// Text before the first space of the full name
    pub firstname: String,
    /// Rest of the full name
    pub lastname: String,
    /// Normalized buyer number
    pub phone: String,
    /// Dashboard metadata
    pub metadata: PaystackMetadata,
}

/// How the popup ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PaystackCallback {
    /// The buyer was charged; verification still has to run
    Success(ProviderResponse),
    /// Closed without paying
    Closed,
}

/// The hosted Paystack popup. Implemented by the shell.
#[async_trait]
pub trait PaystackPopup: Send + Sync {
    /// Opens the popup and waits until it reports success or is closed.
    async fn open(&self, setup: PaystackSetup) -> PaystackCallback;
}

/// Converts a GHS amount to pesewas.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_minor_units(amount: f64) -> u64 {
    (amount.max(0.0) * 100.0).round() as u64
}

/// [`PaymentStrategy`] for Paystack.
pub struct PaystackStrategy {
    api: ApiClient,
    popup: Arc<dyn PaystackPopup>,
    prompt: Arc<dyn VerificationPrompt>,
    public_key: Option<String>,
    display_delay: Duration,
}

impl PaystackStrategy {
    /// Strategy using the public key and display delay from `config`.
    #[must_use]
    pub fn new(
        api: ApiClient,
        config: &PaymentsConfig,
        popup: Arc<dyn PaystackPopup>,
        prompt: Arc<dyn VerificationPrompt>,
    ) -> Self {
        Self {
            api,
            popup,
            prompt,
            public_key: config
                .paystack_public_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            display_delay: config.verification_display_delay(),
        }
    }

    /// Whether a public key is configured; without one the pay button stays disabled.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.public_key.is_some()
    }
}

#[async_trait]
impl PaymentStrategy for PaystackStrategy {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Paystack
    }

    #[instrument(skip_all, fields(method = "paystack", amount = order.amount))]
    async fn initiate(&self, order: PaymentOrder) -> Result<PaymentOutcome> {
        let phone = normalized_buyer_phone(&order)?;
        let Some(public_key) = self.public_key.clone() else {
            warn!("Paystack public key is not configured");
            return Err(Error::Config {
                message: "Paystack public key is not configured".to_string(),
            });
        };
        ensure_no_existing_access(&self.api, &order).await?;

        let reference = paystack_reference(Utc::now());
        let (firstname, lastname) = order
            .buyer_name
            .split_once(' ')
            .map_or((order.buyer_name.as_str(), ""), |(first, rest)| (first, rest.trim()));

        info!("Opening Paystack checkout {}", reference);
        let callback = self
            .popup
            .open(PaystackSetup {
                public_key,
                reference: reference.clone(),
                email: order.buyer_email.clone(),
                amount: to_minor_units(order.amount),
                currency: CURRENCY.to_string(),
                channels: ALLOWED_CHANNELS.to_vec(),
                firstname: firstname.to_string(),
                lastname: lastname.to_string(),
                phone: phone.clone(),
                metadata: PaystackMetadata::new(&order.buyer_name, &phone),
            })
            .await;

        match callback {
            PaystackCallback::Success(provider_response) => {
                info!("Paystack reported success for {}, verifying", reference);
                let verification = PaymentVerification::new(
                    self.api.clone(),
                    reference,
                    order.checkout_payload,
                    provider_response,
                );
                Ok(verification
                    .run(self.prompt.as_ref(), self.display_delay)
                    .await)
            }
            PaystackCallback::Closed => {
                info!("Paystack checkout {} closed", reference);
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
    use crate::payment::RecordingStatus;
    use crate::payment::verification::{VerificationDecision, VerificationStatus};
    use crate::test_utils::{
        FakePaystackPopup, ScriptedPrompt, api_client_for, init_test_tracing, sample_order,
    };
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn payments_config() -> PaymentsConfig {
        PaymentsConfig {
            paystack_public_key: Some("pk_test_123".to_string()),
            verification_display_ms: 0,
            ..PaymentsConfig::default()
        }
    }

    fn no_access(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/purchases/check-access");
            then.status(200).json_body(json!({ "hasAccess": false }));
        });
    }

    #[test]
    fn test_minor_units_round() {
        assert_eq!(to_minor_units(350.0), 35_000);
        assert_eq!(to_minor_units(19.99), 1_999);
        assert_eq!(to_minor_units(0.125), 13);
    }

    #[test]
    fn test_setup_wire_names() {
        let setup = PaystackSetup {
            public_key: "pk".to_string(),
            reference: "FMT_1".to_string(),
            email: "ops@acme.test".to_string(),
            amount: 100,
            currency: CURRENCY.to_string(),
            channels: ALLOWED_CHANNELS.to_vec(),
            firstname: "Ama".to_string(),
            lastname: "Mensah".to_string(),
            phone: "+233241234567".to_string(),
            metadata: PaystackMetadata::new("Ama Mensah", "+233241234567"),
        };
        let value = serde_json::to_value(&setup).unwrap();
        assert_eq!(value["key"], json!("pk"));
        assert_eq!(value["ref"], json!("FMT_1"));
        assert_eq!(value["channels"], json!(["mobile_money", "card"]));
        assert_eq!(
            value["metadata"]["custom_fields"][1],
            json!({ "display_name": "Phone", "variable_name": "phone", "value": "+233241234567" })
        );
    }

    #[tokio::test]
    async fn test_success_is_verified_and_recorded() -> Result<()> {
        init_test_tracing();
        let server = MockServer::start_async().await;
        no_access(&server);
        let record = server.mock(|when, then| {
            when.method(POST).path("/payments/paystack/checkout");
            then.status(200).json_body(json!({ "message": "Purchase recorded" }));
        });

        let popup = Arc::new(FakePaystackPopup::new(PaystackCallback::Success(
            ProviderResponse {
                status: Some("success".to_string()),
                ..ProviderResponse::default()
            },
        )));
        let prompt = Arc::new(ScriptedPrompt::new([]));
        let strategy = PaystackStrategy::new(
            api_client_for(&server),
            &payments_config(),
            popup.clone(),
            prompt.clone(),
        );

        let outcome = strategy.initiate(sample_order()).await?;
        record.assert();

        let setups = popup.setups();
        assert_eq!(setups.len(), 1);
        assert_eq!(setups[0].amount, 35_000);
        assert_eq!(setups[0].currency, "GHS");
        assert_eq!(setups[0].firstname, "Ama");
        assert_eq!(setups[0].lastname, "Mensah");
        assert_eq!(setups[0].phone, "+233241234567");
        assert!(setups[0].reference.starts_with("FMT_"));

        let PaymentOutcome::Success(receipt) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(receipt.reference, setups[0].reference);
        assert!(matches!(receipt.recording, RecordingStatus::Recorded(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_non_ok_recording_then_retry_uses_same_reference() -> Result<()> {
        let server = MockServer::start_async().await;
        no_access(&server);
        let record = server.mock(|when, then| {
            when.method(POST).path("/payments/paystack/checkout");
            then.status(400).json_body(json!({ "message": "Transaction not found" }));
        });

        let popup = Arc::new(FakePaystackPopup::new(PaystackCallback::Success(
            ProviderResponse::default(),
        )));
        let prompt = Arc::new(ScriptedPrompt::new([
            VerificationDecision::Retry,
            VerificationDecision::Dismiss,
        ]));
        let strategy = PaystackStrategy::new(
            api_client_for(&server),
            &payments_config(),
            popup.clone(),
            prompt.clone(),
        );

        let outcome = strategy.initiate(sample_order()).await?;
        assert_eq!(record.hits(), 2);
        assert_eq!(
            outcome,
            PaymentOutcome::Closed {
                unresolved_reference: Some(popup.setups()[0].reference.clone())
            }
        );
        assert!(prompt.statuses().contains(&VerificationStatus::Error {
            message: "Transaction not found".to_string()
        }));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_public_key_is_config_error() -> Result<()> {
        let server = MockServer::start_async().await;
        let check = server.mock(|when, then| {
            when.method(GET).path("/purchases/check-access");
            then.status(200).json_body(json!({ "hasAccess": false }));
        });

        let popup = Arc::new(FakePaystackPopup::new(PaystackCallback::Closed));
        let strategy = PaystackStrategy::new(
            api_client_for(&server),
            &PaymentsConfig::default(),
            popup.clone(),
            Arc::new(ScriptedPrompt::new([])),
        );
        assert!(!strategy.is_available());

        let result = strategy.initiate(sample_order()).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        assert_eq!(check.hits(), 0);
        assert!(popup.setups().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_closed_popup_sends_nothing() -> Result<()> {
        let server = MockServer::start_async().await;
        no_access(&server);
        let record = server.mock(|when, then| {
            when.method(POST).path("/payments/paystack/checkout");
            then.status(200).json_body(json!({}));
        });

        let strategy = PaystackStrategy::new(
            api_client_for(&server),
            &payments_config(),
            Arc::new(FakePaystackPopup::new(PaystackCallback::Closed)),
            Arc::new(ScriptedPrompt::new([])),
        );
        assert_eq!(
            strategy.initiate(sample_order()).await?,
            PaymentOutcome::Closed {
                unresolved_reference: None
            }
        );
        assert_eq!(record.hits(), 0);
        Ok(())
    }
}
