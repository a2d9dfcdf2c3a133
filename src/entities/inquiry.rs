//! Inquiry records - quote requests, contact messages and newsletter calls.

use serde::{Deserialize, Serialize};

/// Quote request body for `POST /quotes`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Reply address
    pub email: String,
    /// Primary contact number
    pub contact_number1: String,
    /// Optional second number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number2: Option<String>,
    /// Optional company name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Requested service
    pub service_type: String,
    /// Budget bracket
    pub budget: String,
    /// Project description
    pub description: String,
}

/// Contact form body for `POST /contact`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    /// Sender name
    pub name: String,
    /// Reply address
    pub email: String,
    /// Message body
    pub message: String,
}

/// How a subscriber leaves the newsletter
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unsubscribe {
    /// Signed token from the link in a newsletter email
    Token(String),
    /// Plain email address typed on the unsubscribe page
    Email(String),
}

/// Response to a newsletter subscription
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    /// Confirmation text
    pub message: String,
    /// Link the subscriber can use to leave
    #[serde(default)]
    pub unsubscribe_url: Option<String>,
}
