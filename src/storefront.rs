//! Storefront facade - the single handle the presentation shell holds.
//!
//! Owns the content store, the backend client and one [`QueryCache`] per
//! record type, and exposes every read and action the pages need.

use crate::api::ApiClient;
use crate::cache::{CachePolicy, QueryCache, QueryKey};
use crate::config::StorefrontConfig;
use crate::content::{ContentStore, SanityClient};
use crate::core::access::{AccessMode, AccessRequestForm, request_access};
use crate::core::catalog::{FilterState, SortKey, browse, related_products};
use crate::core::forms::ReviewDraft;
use crate::entities::purchase::MessageResponse;
use crate::entities::{AppListItem, Product, Review, Sector, Testimonial};
use crate::errors::{Error, Result};
use crate::payment::hubtel::HubtelModal;
use crate::payment::paystack::PaystackPopup;
use crate::payment::verification::VerificationPrompt;
use crate::payment::{CheckoutSession, HubtelStrategy, PaymentStrategy, PaystackStrategy};
use std::sync::Arc;
use tracing::{info, warn};

/// The providers' hosted UIs, supplied by the shell.
#[derive(Clone)]
pub struct PaymentUi {
    /// Hubtel checkout modal
    pub hubtel: Arc<dyn HubtelModal>,
    /// Paystack inline popup
    pub paystack: Arc<dyn PaystackPopup>,
    /// Dialog shown while a Paystack payment is verified
    pub verification: Arc<dyn VerificationPrompt>,
}

/// Shared storefront state. Cheap to clone.
#[derive(Clone)]
pub struct Storefront {
    config: Arc<StorefrontConfig>,
    content: Arc<dyn ContentStore>,
    api: ApiClient,
    products: QueryCache<Vec<Product>>,
    product: QueryCache<Option<Product>>,
    sectors: QueryCache<Vec<Sector>>,
    reviews: QueryCache<Vec<Review>>,
    testimonials: QueryCache<Vec<Testimonial>>,
    apps: QueryCache<Vec<AppListItem>>,
}

impl Storefront {
    /// Builds the content and backend clients from `config`.
    pub fn from_config(config: StorefrontConfig) -> Result<Self> {
        let content = Arc::new(SanityClient::new(&config.content));
        let api = ApiClient::new(&config.api)?;
        Ok(Self::new(config, content, api))
    }

    /// Storefront over existing clients, with empty caches.
    #[must_use]
    pub fn new(config: StorefrontConfig, content: Arc<dyn ContentStore>, api: ApiClient) -> Self {
        let policy = CachePolicy::from(&config.cache);
        Self {
            config: Arc::new(config),
            content,
            api,
            products: QueryCache::new(policy),
            product: QueryCache::new(policy),
            sectors: QueryCache::new(policy),
            reviews: QueryCache::new(policy),
            testimonials: QueryCache::new(policy),
            apps: QueryCache::new(policy),
        }
    }

    /// Configuration the storefront was built from.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Backend client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Every published product.
    pub async fn products(&self) -> Result<Vec<Product>> {
        self.products
            .fetch(&QueryKey::from(["apps"]), || self.content.published_products())
            .await
    }

    /// The marketplace grid: published products filtered and sorted.
    pub async fn marketplace(&self, filter: &FilterState, sort: SortKey) -> Result<Vec<Product>> {
        let products = self.products().await?;
        Ok(browse(&products, filter, sort))
    }

    /// Initial marketplace filter, with the price range opened to the priciest product.
    pub async fn default_filter(&self) -> Result<FilterState> {
        Ok(FilterState::for_catalog(&self.products().await?))
    }

    /// "You may also like" suggestions for the item detail page.
    pub async fn related(&self, product: &Product) -> Result<Vec<Product>> {
        let products = self.products().await?;
        let sector_id = product.sectors.first().map(|s| s.id.as_str());
        Ok(related_products(
            &products,
            &product.id,
            sector_id,
            &mut rand::thread_rng(),
        ))
    }

    /// Landing-page featured products.
    pub async fn featured(&self) -> Result<Vec<Product>> {
        self.products
            .fetch(&QueryKey::from(["featured-apps"]), || {
                self.content.featured_products()
            })
            .await
    }

    /// Item detail product.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        self.product
            .fetch(&QueryKey::from(["app", slug]), || {
                self.content.product_by_slug(slug)
            })
            .await
    }

    /// Product by content-store id.
    pub async fn product_by_id(&self, id: &str) -> Result<Option<Product>> {
        self.product
            .fetch(&QueryKey::from(["app-id", id]), || self.content.product_by_id(id))
            .await
    }

    /// Every sector, by name.
    pub async fn sectors(&self) -> Result<Vec<Sector>> {
        self.sectors
            .fetch(&QueryKey::from(["sectors"]), || self.content.sectors())
            .await
    }

    /// Apps offered in the review form's picker.
    pub async fn app_list(&self) -> Result<Vec<AppListItem>> {
        self.apps
            .fetch(&QueryKey::from(["app-list"]), || self.content.app_list())
            .await
    }

    /// Reviews shown on the landing page.
    pub async fn featured_reviews(&self) -> Result<Vec<Review>> {
        self.reviews
            .fetch(&QueryKey::from(["featured-reviews"]), || {
                self.api.featured_reviews()
            })
            .await
    }

    /// Reviews of one app.
    pub async fn app_reviews(&self, app_id: &str) -> Result<Vec<Review>> {
        self.reviews
            .fetch(&QueryKey::from(["reviews", app_id]), || {
                self.api.app_reviews(app_id)
            })
            .await
    }

    /// Landing-page testimonials.
    pub async fn testimonials(&self) -> Result<Vec<Testimonial>> {
        self.testimonials
            .fetch(&QueryKey::from(["testimonials"]), || self.api.testimonials())
            .await
    }

    /// Validates and submits a review, then drops the cached review lists it
    /// would appear in.
    pub async fn submit_review(&self, draft: &ReviewDraft) -> Result<MessageResponse> {
        let review = draft.validate()?;
        let response = self.api.submit_review(&review).await?;
        if let Some(app_id) = review.app_id.as_deref() {
            self.reviews.invalidate(&QueryKey::from(["reviews", app_id])).await;
        }
        self.reviews
            .invalidate(&QueryKey::from(["featured-reviews"]))
            .await;
        Ok(response)
    }

    /// Submits a trial or free-access request for `product_id`.
    pub async fn request_access(
        &self,
        mode: AccessMode,
        product_id: &str,
        form: &AccessRequestForm,
    ) -> Result<&'static str> {
        request_access(&self.api, mode, product_id, form).await
    }

    /// Opens a checkout for `product_id`.
    ///
    /// Hubtel is offered only when enabled in configuration.
    pub async fn checkout(&self, product_id: &str, ui: &PaymentUi) -> Result<CheckoutSession> {
        let product = self
            .product_by_id(product_id)
            .await?
            .ok_or_else(|| Error::ProductNotFound {
                key: product_id.to_string(),
            })?;

        let payments = &self.config.payments;
        let hubtel: Option<Box<dyn PaymentStrategy>> = if payments.hubtel_enabled {
            Some(Box::new(HubtelStrategy::new(
                self.api.clone(),
                Arc::clone(&ui.hubtel),
            )))
        } else {
            warn!("Hubtel is disabled; checkout offers Paystack only");
            None
        };
        let paystack = Box::new(PaystackStrategy::new(
            self.api.clone(),
            payments,
            Arc::clone(&ui.paystack),
            Arc::clone(&ui.verification),
        ));

        info!("Starting checkout for {}", product.id);
        Ok(CheckoutSession::new(product, hubtel, paystack))
    }

    /// Drops every cached query.
    pub async fn refresh(&self) {
        self.products.clear().await;
        self.product.clear().await;
        self.sectors.clear().await;
        self.reviews.clear().await;
        self.testimonials.clear().await;
        self.apps.clear().await;
    }
}
