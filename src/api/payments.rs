//! Payment provider endpoints: Hubtel checkout configuration and the
//! post-payment recording calls of both providers.

use super::{ApiClient, ApiResponse};
use crate::entities::{CheckoutPayload, ProviderResponse};
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

/// Body of `POST /payments/hubtel/config`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubtelConfigRequest<'a> {
    /// Amount in GHS
    pub amount: f64,
    /// Shown to the buyer inside the modal
    pub purchase_description: &'a str,
    /// Normalized `+233...` number
    pub customer_phone_number: &'a str,
    /// Locally generated reference for this attempt
    pub client_reference: &'a str,
    /// Order details the backend records with the payment
    pub checkout_payload: &'a CheckoutPayload,
}

/// Answer of `POST /payments/hubtel/config`.
///
/// `config` is handed to the modal untouched; `client_reference`, when the
/// backend sends one, replaces the locally generated reference.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubtelConfigResponse {
    /// Modal configuration
    #[serde(default)]
    pub config: Option<Map<String, Value>>,
    /// Server-issued reference, when the backend assigns one
    #[serde(default)]
    pub client_reference: Option<String>,
}

/// Body of `POST /payments/hubtel/checkout`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HubtelCheckoutRecord<'a> {
    /// Reference the modal was opened with
    pub client_reference: &'a str,
    /// Order details of the attempt
    pub checkout_payload: &'a CheckoutPayload,
    /// Callback data from the modal
    pub payment_response: &'a ProviderResponse,
}

/// Body of `POST /payments/paystack/checkout`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaystackCheckoutRecord<'a> {
    /// Reference the popup was opened with
    pub reference: &'a str,
    /// Order details of the attempt
    pub checkout_payload: &'a CheckoutPayload,
    /// Callback data from the popup
    pub payment_response: &'a ProviderResponse,
}

impl ApiClient {
    /// `POST /payments/hubtel/config`
    ///
    /// Returns the raw response: the strategy decides what a non-OK answer or a
    /// body without `config` means.
    pub async fn create_hubtel_config(&self, request: &HubtelConfigRequest<'_>) -> Result<ApiResponse> {
        info!(
            "Creating Hubtel checkout config for reference {}",
            request.client_reference
        );
        self.post_raw("/payments/hubtel/config", request).await
    }

    /// `POST /payments/hubtel/checkout`
    pub async fn record_hubtel_checkout(&self, record: &HubtelCheckoutRecord<'_>) -> Result<ApiResponse> {
        info!("Recording Hubtel checkout {}", record.client_reference);
        self.post_raw("/payments/hubtel/checkout", record).await
    }

    /// `POST /payments/paystack/checkout`
    pub async fn record_paystack_checkout(
        &self,
        record: &PaystackCheckoutRecord<'_>,
    ) -> Result<ApiResponse> {
        info!("Recording Paystack checkout {}", record.reference);
        self.post_raw("/payments/paystack/checkout", record).await
    }
}
