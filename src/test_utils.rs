//! Shared test utilities for the storefront core.
//!
//! This module provides product and checkout fixtures with sensible defaults,
//! clients pointed at an `httpmock` server, and scripted stand-ins for the
//! providers' hosted UIs.

use crate::{
    api::ApiClient,
    config::ContentConfig,
    content::SanityClient,
    core::checkout::{CheckoutField, CheckoutForm},
    entities::{CheckoutPayload, PaymentOrder, Product, Promotion, Sector},
    payment::{
        hubtel::{HubtelCallback, HubtelModal, HubtelModalRequest},
        paystack::{PaystackCallback, PaystackPopup, PaystackSetup},
        verification::{VerificationDecision, VerificationPrompt, VerificationStatus},
    },
};
use async_trait::async_trait;
use httpmock::MockServer;
use std::collections::VecDeque;
use std::sync::{Mutex, Once};

static TRACING: Once = Once::new();

/// Routes `tracing` output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("fmt_storefront=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Creates a free product with sensible defaults.
///
/// # Defaults
/// * `price`: None
/// * `is_free`: true
/// * everything else empty, unpublished date
pub fn free_product(id: &str, title: &str) -> Product {
    Product {
        id: id.to_string(),
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        price: None,
        is_free: true,
        requires_account: false,
        has_trial_usage: false,
        short_description: None,
        description: None,
        main_image: None,
        screenshots: Vec::new(),
        sectors: Vec::new(),
        promotion: None,
        platforms: None,
        video: None,
        features: Vec::new(),
        tags: Vec::new(),
        published_at: None,
        is_published: true,
    }
}

/// Creates a paid product at `price` GHS without a promotion.
pub fn paid_product(id: &str, title: &str, price: f64) -> Product {
    Product {
        price: Some(price),
        is_free: false,
        ..free_product(id, title)
    }
}

/// Creates a paid product carrying a promotion.
pub fn promoted_product(id: &str, title: &str, price: f64, discount: f64, active: bool) -> Product {
    Product {
        promotion: Some(Promotion {
            has_promotion: true,
            discount_price: Some(discount),
            is_active: active,
            start_date: None,
            end_date: None,
        }),
        ..paid_product(id, title, price)
    }
}

/// Adds a sector with the given slug to `product`.
pub fn with_sector(mut product: Product, slug: &str) -> Product {
    product.sectors.push(Sector {
        id: format!("sector-{slug}"),
        name: slug.to_string(),
        slug: slug.to_string(),
        icon: None,
    });
    product
}

/// A checkout form with every required field filled in.
///
/// Buyer is "Ama Mensah" of Acme Pharmacy, `ops@acme.test`, phone `0241234567`.
pub fn valid_checkout_form() -> CheckoutForm {
    let mut form = CheckoutForm::new();
    form.set(CheckoutField::FirstName, "Ama");
    form.set(CheckoutField::LastName, "Mensah");
    form.set(CheckoutField::OrganizationName, "Acme Pharmacy");
    form.set(CheckoutField::OrganizationEmail, "ops@acme.test");
    form.set(CheckoutField::PhoneNumber, "0241234567");
    form.set(CheckoutField::Street, "1 Ring Road");
    form.set(CheckoutField::City, "Accra");
    form.set(CheckoutField::State, "Greater Accra");
    form.set(CheckoutField::Country, "Ghana");
    form
}

/// Order for "Pharmacy Pro" (`app-1`), promoted from 500 to 350 GHS, placed
/// with [`valid_checkout_form`].
#[allow(clippy::unwrap_used)]
pub fn sample_order() -> PaymentOrder {
    valid_checkout_form()
        .to_order(&promoted_product("app-1", "Pharmacy Pro", 500.0, 350.0, true))
        .unwrap()
}

/// Checkout payload of [`sample_order`].
pub fn checkout_payload() -> CheckoutPayload {
    sample_order().checkout_payload
}

/// Backend client pointed at a mock server.
pub fn api_client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_client(reqwest::Client::new(), &server.base_url())
}

/// Content client pointed at a mock server, on the default dataset and API version.
pub fn sanity_client_for(server: &MockServer) -> SanityClient {
    SanityClient::new(&ContentConfig {
        project_id: Some("test-project".to_string()),
        base_url: Some(server.base_url()),
        ..ContentConfig::default()
    })
}

/// Hubtel modal that answers every open with the same callback.
pub struct FakeHubtelModal {
    callback: HubtelCallback,
    requests: Mutex<Vec<HubtelModalRequest>>,
}

impl FakeHubtelModal {
    pub fn new(callback: HubtelCallback) -> Self {
        Self {
            callback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request the modal was opened with.
    #[allow(clippy::unwrap_used)]
    pub fn requests(&self) -> Vec<HubtelModalRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HubtelModal for FakeHubtelModal {
    #[allow(clippy::unwrap_used)]
    async fn open(&self, request: HubtelModalRequest) -> HubtelCallback {
        self.requests.lock().unwrap().push(request);
        self.callback.clone()
    }
}

/// Paystack popup that answers every open with the same callback.
pub struct FakePaystackPopup {
    callback: PaystackCallback,
    setups: Mutex<Vec<PaystackSetup>>,
}

impl FakePaystackPopup {
    pub fn new(callback: PaystackCallback) -> Self {
        Self {
            callback,
            setups: Mutex::new(Vec::new()),
        }
    }

    #[allow(clippy::unwrap_used)]
    pub fn setups(&self) -> Vec<PaystackSetup> {
        self.setups.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaystackPopup for FakePaystackPopup {
    #[allow(clippy::unwrap_used)]
    async fn open(&self, setup: PaystackSetup) -> PaystackCallback {
        self.setups.lock().unwrap().push(setup);
        self.callback.clone()
    }
}

/// Verification dialog that replays scripted decisions and records every
/// status it is shown. Dismisses once the script runs out.
pub struct ScriptedPrompt {
    decisions: Mutex<VecDeque<VerificationDecision>>,
    statuses: Mutex<Vec<VerificationStatus>>,
    errors_shown: Mutex<u32>,
}

impl ScriptedPrompt {
    pub fn new(decisions: impl IntoIterator<Item = VerificationDecision>) -> Self {
        Self {
            decisions: Mutex::new(decisions.into_iter().collect()),
            statuses: Mutex::new(Vec::new()),
            errors_shown: Mutex::new(0),
        }
    }

    #[allow(clippy::unwrap_used)]
    pub fn statuses(&self) -> Vec<VerificationStatus> {
        self.statuses.lock().unwrap().clone()
    }

    #[allow(clippy::unwrap_used)]
    pub fn errors_shown(&self) -> u32 {
        *self.errors_shown.lock().unwrap()
    }
}

#[async_trait]
impl VerificationPrompt for ScriptedPrompt {
    #[allow(clippy::unwrap_used)]
    fn status_changed(&self, status: &VerificationStatus) {
        self.statuses.lock().unwrap().push(status.clone());
    }

    #[allow(clippy::unwrap_used)]
    async fn on_error(&self, _message: &str) -> VerificationDecision {
        *self.errors_shown.lock().unwrap() += 1;
        self.decisions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(VerificationDecision::Dismiss)
    }
}
