//! Sanity HTTP query API client.
//!
//! Queries go to `GET {host}/v{apiVersion}/data/query/{dataset}` with the GROQ
//! text in `query`, each parameter as a JSON-encoded `$name`, and the
//! `published` perspective so drafts never leak into the storefront.

use super::{ContentStore, queries};
use crate::config::ContentConfig;
use crate::entities::{AppListItem, Product, Sector};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Content store client. Without a project id every query resolves to an
/// empty result without touching the network.
#[derive(Debug, Clone)]
pub struct SanityClient {
    http: Client,
    endpoint: Option<String>,
}

impl SanityClient {
    /// Client on a fresh HTTP client.
    #[must_use]
    pub fn new(config: &ContentConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Client sharing `http`. Without a project id no request is ever made.
    #[must_use]
    pub fn with_client(http: Client, config: &ContentConfig) -> Self {
        let endpoint = config.project_id.as_deref().filter(|p| !p.is_empty()).map(|project_id| {
            let host = config.base_url.clone().unwrap_or_else(|| {
                let api = if config.use_cdn { "apicdn" } else { "api" };
                format!("https://{project_id}.{api}.sanity.io")
            });
            format!(
                "{}/v{}/data/query/{}",
                host.trim_end_matches('/'),
                config.api_version,
                config.dataset
            )
        });
        if endpoint.is_none() {
            warn!("No content project id configured; catalog queries will return nothing");
        }
        Self { http, endpoint }
    }

    /// Whether a project is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Runs `query` with `params` (name without `$`, JSON value).
    ///
    /// Returns `Ok(None)` when no project is configured.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, Value)],
    ) -> Result<Option<T>> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Ok(None);
        };

        let mut pairs: Vec<(String, String)> = vec![
            ("query".to_string(), query.trim().to_string()),
            ("perspective".to_string(), "published".to_string()),
        ];
        for (name, value) in params {
            pairs.push((format!("${name}"), serde_json::to_string(value)?));
        }

        debug!("Content query with {} params", params.len());
        let response = self.http.get(endpoint).query(&pairs).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/description")
                        .or_else(|| v.get("message"))
                        .and_then(Value::as_str)
                        .map(ToString::to_string)
                })
                .unwrap_or_else(|| "Content query failed".to_string());
            warn!("Content query failed with status {}: {}", status, message);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let decoded: QueryResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::InvalidResponse {
                message: format!("content query result: {e}"),
            })?;
        Ok(Some(decoded.result))
    }

    async fn fetch_list<T: DeserializeOwned>(&self, query: &str) -> Result<Vec<T>> {
        Ok(self
            .fetch::<Option<Vec<T>>>(query, &[])
            .await?
            .flatten()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
        if slug.is_empty() {
            return Ok(None);
        }
        Ok(self
            .fetch::<Option<Product>>(queries::PRODUCT_BY_SLUG, &[("slug", Value::from(slug))])
            .await?
            .flatten())
    }

    async fn product_by_id(&self, id: &str) -> Result<Option<Product>> {
        if id.is_empty() {
            return Ok(None);
        }
        Ok(self
            .fetch::<Option<Product>>(queries::PRODUCT_BY_ID, &[("id", Value::from(id))])
            .await?
            .flatten())
    }

    async fn published_products(&self) -> Result<Vec<Product>> {
        self.fetch_list(queries::PUBLISHED_PRODUCTS).await
    }

    async fn featured_products(&self) -> Result<Vec<Product>> {
        self.fetch_list(queries::FEATURED_PRODUCTS).await
    }

    async fn sectors(&self) -> Result<Vec<Sector>> {
        self.fetch_list(queries::SECTORS).await
    }

    async fn app_list(&self) -> Result<Vec<AppListItem>> {
        self.fetch_list(queries::APP_LIST).await
    }
}
