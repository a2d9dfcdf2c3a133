//! Read-only queries against the headless content store.
//!
//! [`ContentStore`] is the seam the rest of the crate reads catalog data
//! through; [`SanityClient`] is the HTTP implementation.

pub mod image;
pub mod queries;
pub mod sanity;

pub use image::image_url;
pub use sanity::SanityClient;

use crate::entities::{AppListItem, Product, Sector};
use crate::errors::Result;
use async_trait::async_trait;

/// Catalog reads the storefront needs.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// One product by its slug, `None` when there is none.
    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>>;

    /// One product by document id.
    async fn product_by_id(&self, id: &str) -> Result<Option<Product>>;

    /// Every published product, ordered by title.
    async fn published_products(&self) -> Result<Vec<Product>>;

    /// The three most recently published products.
    async fn featured_products(&self) -> Result<Vec<Product>>;

    /// Sectors ordered by name.
    async fn sectors(&self) -> Result<Vec<Sector>>;

    /// Id and title of every published product, for the review form.
    async fn app_list(&self) -> Result<Vec<AppListItem>>;
}
