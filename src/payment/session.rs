//! One buyer's checkout of one product: the form, the provider choice, and
//! the single-flight pay action.

use super::{PaymentOutcome, PaymentStrategy};
use crate::core::checkout::{CheckoutField, CheckoutForm};
use crate::entities::{PaymentMethod, Product};
use crate::errors::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Held while a payment is in flight; releases the pay control on drop.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::PaymentInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Checkout page state for one product.
pub struct CheckoutSession {
    product: Product,
    form: CheckoutForm,
    hubtel: Option<Box<dyn PaymentStrategy>>,
    paystack: Box<dyn PaymentStrategy>,
    processing: AtomicBool,
}

impl CheckoutSession {
    /// Starts a checkout. Hubtel is preselected when it is offered.
    #[must_use]
    pub fn new(
        product: Product,
        hubtel: Option<Box<dyn PaymentStrategy>>,
        paystack: Box<dyn PaymentStrategy>,
    ) -> Self {
        let mut form = CheckoutForm::new();
        form.set_payment_method(if hubtel.is_some() {
            PaymentMethod::Hubtel
        } else {
            PaymentMethod::Paystack
        });
        Self {
            product,
            form,
            hubtel,
            paystack,
            processing: AtomicBool::new(false),
        }
    }

    /// Product being bought.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Current form state and its errors.
    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Updates one field and revalidates the form.
    pub fn set_field(&mut self, field: CheckoutField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Providers the buyer can pick from, primary first.
    #[must_use]
    pub fn available_methods(&self) -> Vec<PaymentMethod> {
        let mut methods = Vec::with_capacity(2);
        if self.hubtel.is_some() {
            methods.push(PaymentMethod::Hubtel);
        }
        methods.push(PaymentMethod::Paystack);
        methods
    }

    /// Provider the next `pay` uses.
    #[must_use]
    pub const fn selected_method(&self) -> PaymentMethod {
        self.form.payment_method()
    }

    /// Switches provider; fails for a provider this session does not offer.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<()> {
        if !self.available_methods().contains(&method) {
            return Err(Error::Config {
                message: format!("Payment method {method} is not available"),
            });
        }
        self.form.set_payment_method(method);
        Ok(())
    }

    /// Whether a payment is in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Whether the pay control should be enabled.
    #[must_use]
    pub fn can_pay(&self) -> bool {
        self.form.is_valid() && !self.is_processing()
    }

    /// Pays with the selected provider.
    ///
    /// Fails with [`Error::PaymentInProgress`] while another attempt from this
    /// session is running, and with [`Error::Validation`] when the form is
    /// incomplete.
    pub async fn pay(&self) -> Result<PaymentOutcome> {
        let _guard = ProcessingGuard::acquire(&self.processing)?;
        let order = self.form.to_order(&self.product)?;

        let method = self.selected_method();
        let strategy = match method {
            PaymentMethod::Hubtel => self.hubtel.as_deref().ok_or_else(|| Error::Config {
                message: "Hubtel payments are not enabled".to_string(),
            })?,
            PaymentMethod::Paystack => self.paystack.as_ref(),
        };

        info!("Paying for {} with {}", self.product.id, method);
        let outcome = strategy.initiate(order).await;
        match &outcome {
            Ok(PaymentOutcome::Success(receipt)) => {
                info!("Payment {} succeeded", receipt.reference);
            }
            Ok(PaymentOutcome::Failure { reason }) => warn!("Payment failed: {}", reason),
            Ok(PaymentOutcome::Closed {
                unresolved_reference: Some(reference),
            }) => warn!("Payment {} left unverified", reference),
            Ok(PaymentOutcome::Closed { .. }) => info!("Payment closed by buyer"),
            Err(e) => warn!("Payment not started: {}", e),
        }
        outcome
    }

    /// Moves the buyer to Paystack after a Hubtel failure.
    ///
    /// Returns whether the selection changed.
    pub fn fall_back_after(&mut self, outcome: &PaymentOutcome) -> bool {
        if self.selected_method() == PaymentMethod::Hubtel
            && matches!(outcome, PaymentOutcome::Failure { .. })
        {
            info!("Switching checkout to Paystack after Hubtel failure");
            self.form.set_payment_method(PaymentMethod::Paystack);
            return true;
        }
        false
    }
}
