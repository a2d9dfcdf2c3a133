//! Purchase and entitlement records exchanged with the `/purchases` and
//! `/app-provisioning` endpoints.

use super::checkout::{BillingAddress, OrganizationDetails, PaymentMethod};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of `GET /purchases/check-access`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheck {
    /// Whether the email already holds an entitlement
    #[serde(default)]
    pub has_access: bool,
}

/// Organization block of a trial or free-access request; address is not collected
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessOrganization {
    /// Organization requesting access
    pub organization_name: String,
    /// Contact email; also the account login
    pub organization_email: String,
    /// Contact number
    pub phone_number: String,
}

/// Body of `POST /purchases/trial` and `POST /purchases/free-access`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    /// Requested product
    pub product_id: String,
    /// Requesting organization
    pub organization_details: AccessOrganization,
}

/// Body of `POST /purchases`
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Purchased product
    pub product_id: String,
    /// Provider reference of the payment
    pub reference: String,
    /// Provider that took the payment
    pub payment_method: PaymentMethod,
    /// Amount paid in GHS
    pub amount: f64,
    /// Buyer and organization
    pub organization_details: OrganizationDetails,
    /// Billing address
    pub billing_address: BillingAddress,
}

/// Body of `POST /app-provisioning`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequest {
    /// Product to provision
    pub product_id: String,
    /// Organization the app is provisioned for
    pub organization_details: OrganizationDetails,
    /// Payment reference, absent for free products
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Generic `{ "message": ... }` acknowledgement
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    /// Confirmation or error text
    #[serde(default)]
    pub message: Option<String>,
}

/// What the backend answered when a completed payment was recorded.
///
/// Only `message` is read here; everything else is kept so the confirmation
/// view can show purchase/provisioning details the backend chooses to return.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RecordedCheckout {
    /// Confirmation text
    #[serde(default)]
    pub message: Option<String>,
    /// Every other field the backend returned
    #[serde(flatten)]
    pub details: Map<String, Value>,
}
