//! Checkout orchestration over the two payment providers.
//!
//! Both providers sit behind [`PaymentStrategy`], so a checkout is written once
//! and parameterized by the buyer's choice. Anything that goes wrong before a
//! provider's hosted UI opens (invalid input, an existing entitlement, missing
//! configuration) is an `Err`; once the UI is open the attempt always ends in
//! a [`PaymentOutcome`].
//!
//! The hosted modals themselves belong to the shell and are reached through
//! [`hubtel::HubtelModal`], [`paystack::PaystackPopup`] and
//! [`verification::VerificationPrompt`].

pub mod hubtel;
pub mod paystack;
pub mod preflight;
pub mod session;
pub mod verification;

pub use hubtel::HubtelStrategy;
pub use paystack::PaystackStrategy;
pub use session::CheckoutSession;

use crate::entities::purchase::RecordedCheckout;
use crate::entities::{PaymentMethod, PaymentOrder, ProviderResponse};
use crate::errors::Result;
use async_trait::async_trait;

/// One payment provider's checkout flow.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Provider this strategy drives.
    fn method(&self) -> PaymentMethod;

    /// Runs one payment attempt for `order` to its terminal outcome.
    async fn initiate(&self, order: PaymentOrder) -> Result<PaymentOutcome>;
}

/// Terminal result of a payment attempt whose provider UI was opened.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// The provider charged the buyer
    Success(PaymentReceipt),
    /// No charge was made; retrying or switching provider is safe
    Failure {
        /// Message shown to the buyer
        reason: String,
    },
    /// The buyer left the flow. With a reference, the provider may have charged
    /// the buyer while the backend never confirmed it.
    Closed {
        /// Reference of a charge that was never confirmed
        unresolved_reference: Option<String>,
    },
}

impl PaymentOutcome {
    /// Whether the buyer was charged.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Proof of a successful charge handed to the confirmation view.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    /// Provider that charged
    pub method: PaymentMethod,
    /// Reference the provider and the backend know the payment by
    pub reference: String,
    /// Provider callback data
    pub provider_response: ProviderResponse,
    /// Backend recording result
    pub recording: RecordingStatus,
}

/// Whether the backend recorded a successful charge.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordingStatus {
    /// The backend recorded the purchase
    Recorded(RecordedCheckout),
    /// The charge stands but needs manual reconciliation
    Failed {
        /// Warning shown next to the success view
        message: String,
    },
}

impl RecordingStatus {
    /// Warning the shell shows next to the success view, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Recorded(_) => None,
            Self::Failed { message } => Some(message),
        }
    }
}

/// Ephemeral state of one payment attempt, alive from the pay click until the
/// provider UI closes or verification ends.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSession {
    /// Provider of the attempt
    pub method: PaymentMethod,
    /// Reference of the attempt
    pub client_reference: String,
    /// Amount in GHS
    pub amount: f64,
    /// Purchase description
    pub description: String,
    /// `+233...` form of the buyer's number
    pub normalized_phone: String,
}
