//! Post-payment verification for Paystack.
//!
//! Once the popup reports success the buyer has been charged, but access is
//! only granted after the backend confirms the transaction with Paystack and
//! records it. [`PaymentVerification`] drives that confirmation as a small
//! state machine: `Processing` then `Success` or `Error`, with `Error`
//! retryable under the same reference.

use super::{PaymentOutcome, PaymentReceipt, RecordingStatus};
use crate::api::ApiClient;
use crate::api::payments::PaystackCheckoutRecord;
use crate::entities::purchase::RecordedCheckout;
use crate::entities::{CheckoutPayload, PaymentMethod, ProviderResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info, warn};

/// Shown when the backend gives no reason of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "We couldn't verify your payment. Please try again.";

/// State of the verification dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationStatus {
    /// A recording request is in flight
    Processing,
    /// The backend confirmed and recorded the payment
    Success(RecordedCheckout),
    /// Confirmation failed; the buyer may retry
    Error {
        /// Message shown in the dialog
        message: String,
    },
}

/// What the buyer chose after a verification error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationDecision {
    /// Send the recording request again
    Retry,
    /// Leave the payment unresolved
    Dismiss,
}

/// The verification dialog. Implemented by the shell.
#[async_trait]
pub trait VerificationPrompt: Send + Sync {
    /// Called on every state transition.
    fn status_changed(&self, status: &VerificationStatus);

    /// Asks the buyer whether to retry after `message` was shown.
    async fn on_error(&self, message: &str) -> VerificationDecision;
}

/// Confirmation of one Paystack payment with the backend.
pub struct PaymentVerification {
    api: ApiClient,
    reference: String,
    checkout_payload: CheckoutPayload,
    payment_response: ProviderResponse,
    status: VerificationStatus,
    attempts: u32,
}

impl PaymentVerification {
    /// Verification of the payment known by `reference`, not yet sent.
    #[must_use]
    pub fn new(
        api: ApiClient,
        reference: String,
        checkout_payload: CheckoutPayload,
        payment_response: ProviderResponse,
    ) -> Self {
        Self {
            api,
            reference,
            checkout_payload,
            payment_response,
            status: VerificationStatus::Processing,
            attempts: 0,
        }
    }

    /// Reference every attempt is sent with.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Current state.
    #[must_use]
    pub const fn status(&self) -> &VerificationStatus {
        &self.status
    }

    /// Recording requests sent so far.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Sends the recording request and moves to `Success` or `Error`.
    pub async fn verify(&mut self) -> &VerificationStatus {
        self.status = VerificationStatus::Processing;
        self.attempts += 1;

        let record = PaystackCheckoutRecord {
            reference: &self.reference,
            checkout_payload: &self.checkout_payload,
            payment_response: &self.payment_response,
        };
        self.status = match self.api.record_paystack_checkout(&record).await {
            Ok(response) if response.is_success() => {
                info!("Verified Paystack payment {}", self.reference);
                VerificationStatus::Success(response.decode().unwrap_or_else(|e| {
                    warn!("Unreadable Paystack recording response: {}", e);
                    RecordedCheckout::default()
                }))
            }
            Ok(response) => {
                let message = response
                    .message()
                    .unwrap_or(DEFAULT_ERROR_MESSAGE)
                    .to_string();
                error!(
                    "Verifying Paystack payment {} returned {}: {}",
                    self.reference, response.status, message
                );
                VerificationStatus::Error { message }
            }
            Err(e) => {
                error!("Error verifying Paystack payment {}: {}", self.reference, e);
                VerificationStatus::Error {
                    message: DEFAULT_ERROR_MESSAGE.to_string(),
                }
            }
        };
        &self.status
    }

    /// Re-sends the recording request with the same reference.
    ///
    /// Only valid from `Error`; in any other state the current status is
    /// returned and no request is made.
    pub async fn retry(&mut self) -> &VerificationStatus {
        if !matches!(self.status, VerificationStatus::Error { .. }) {
            warn!(
                "Ignoring retry of payment {} outside the error state",
                self.reference
            );
            return &self.status;
        }
        info!(
            "Retrying verification of payment {} (attempt {})",
            self.reference,
            self.attempts + 1
        );
        self.verify().await
    }

    /// Runs verification to completion, asking `prompt` after each error.
    ///
    /// On success the result stays on screen for `display_delay` before the
    /// outcome is returned. Dismissing an error leaves the payment unresolved,
    /// so its reference goes back to the caller.
    pub async fn run(
        mut self,
        prompt: &dyn VerificationPrompt,
        display_delay: Duration,
    ) -> PaymentOutcome {
        loop {
            prompt.status_changed(&VerificationStatus::Processing);
            let status = self.verify().await.clone();
            prompt.status_changed(&status);

            match status {
                VerificationStatus::Success(recorded) => {
                    tokio::time::sleep(display_delay).await;
                    return PaymentOutcome::Success(PaymentReceipt {
                        method: PaymentMethod::Paystack,
                        reference: self.reference,
                        provider_response: self.payment_response,
                        recording: RecordingStatus::Recorded(recorded),
                    });
                }
                VerificationStatus::Error { message } => {
                    match prompt.on_error(&message).await {
                        VerificationDecision::Retry => {}
                        VerificationDecision::Dismiss => {
                            warn!(
                                "Verification of payment {} dismissed after {} attempts",
                                self.reference, self.attempts
                            );
                            return PaymentOutcome::Closed {
                                unresolved_reference: Some(self.reference),
                            };
                        }
                    }
                }
                VerificationStatus::Processing => {}
            }
        }
    }
}
