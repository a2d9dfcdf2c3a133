//! Checkout records - the buyer form, the order handed to a payment provider,
//! and the payload the backend uses to provision a completed purchase.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Payment provider chosen on the checkout form
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Mobile money, card and wallets through Hubtel
    #[default]
    Hubtel,
    /// Card and mobile money through Paystack
    Paystack,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hubtel => f.write_str("hubtel"),
            Self::Paystack => f.write_str("paystack"),
        }
    }
}

/// Buyer organization section of the checkout form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDetails {
    /// Buyer first name
    pub first_name: String,
    /// Buyer last name
    pub last_name: String,
    /// Organization the license is for
    pub organization_name: String,
    /// Receipt and account email
    pub organization_email: String,
    /// Phone number as typed
    pub phone_number: String,
}

impl OrganizationDetails {
    /// "First Last", as shown to the payment provider.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Billing address section of the checkout form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    /// Street address
    pub street: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Country
    pub country: String,
    /// Optional postal code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Complete, validated checkout form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFormData {
    /// Buyer and organization
    pub organization_details: OrganizationDetails,
    /// Billing address
    pub billing_address: BillingAddress,
    /// Selected provider
    pub payment_method: PaymentMethod,
}

/// One purchased product
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Content-store id of the product
    pub product_id: String,
    /// Product title
    pub title: String,
    /// Effective unit price in GHS at the time of checkout
    pub price: f64,
}

/// Everything the backend needs to provision a purchase once payment succeeds.
///
/// Sent verbatim with the Hubtel config request and with both providers'
/// checkout-recording calls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    /// Content-store id of the product
    pub product_id: String,
    /// Product title
    pub product_title: String,
    /// Amount charged, in `currency`
    pub amount: f64,
    /// Always `GHS`
    pub currency: String,
    /// Buyer and organization
    pub organization_details: OrganizationDetails,
    /// Billing address
    pub billing_address: BillingAddress,
    /// Provider used for the attempt
    pub payment_method: PaymentMethod,
    /// Purchased products
    pub items: Vec<OrderItem>,
}

/// A payment attempt handed to a [`crate::payment::PaymentStrategy`]
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentOrder {
    /// Amount in GHS
    pub amount: f64,
    /// Purchase description shown by the provider
    pub description: String,
    /// Phone number as typed; each provider normalizes it
    pub buyer_phone: String,
    /// Email the entitlement is granted to
    pub buyer_email: String,
    /// "First Last"
    pub buyer_name: String,
    /// Purchased products
    pub items: Vec<OrderItem>,
    /// Payload recorded with the payment
    pub checkout_payload: CheckoutPayload,
    /// Seed for the Hubtel client reference
    pub reference_seed: Option<String>,
}

/// Raw payload a provider hands to its success/failure callback.
///
/// Only the fields below are read by the storefront; the rest is forwarded
/// untouched to the backend, which owns the provider-specific parsing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Provider reference of the transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Provider status string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Provider message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Every other field, forwarded as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
