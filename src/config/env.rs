//! Environment overrides for the storefront configuration.
//!
//! Values usually come from a `.env` file loaded by `dotenvy` at startup.
//! Blank variables are ignored.

use super::app::{DEFAULT_CONFIG_PATH, StorefrontConfig, load_config_or_default};
use crate::errors::Result;

/// Backend base URL
pub const API_URL: &str = "API_URL";
/// Content store project id
pub const SANITY_PROJECT_ID: &str = "SANITY_PROJECT_ID";
/// Content store dataset
pub const SANITY_DATASET: &str = "SANITY_DATASET";
/// Content store API version
pub const SANITY_API_VERSION: &str = "SANITY_API_VERSION";
/// Paystack public key
pub const PAYSTACK_PUBLIC_KEY: &str = "PAYSTACK_PUBLIC_KEY";
/// Path of the TOML file, defaults to `storefront.toml`
pub const STOREFRONT_CONFIG: &str = "STOREFRONT_CONFIG";

/// Applies overrides read through `lookup` on top of `config`.
///
/// Takes the lookup as a function so tests don't have to touch the process
/// environment.
#[must_use]
pub fn apply_overrides_from<F>(mut config: StorefrontConfig, lookup: F) -> StorefrontConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(API_URL) {
        config.api.base_url = url;
    }
    if let Some(project_id) = get(SANITY_PROJECT_ID) {
        config.content.project_id = Some(project_id);
    }
    if let Some(dataset) = get(SANITY_DATASET) {
        config.content.dataset = dataset;
    }
    if let Some(version) = get(SANITY_API_VERSION) {
        config.content.api_version = version;
    }
    if let Some(key) = get(PAYSTACK_PUBLIC_KEY) {
        config.payments.paystack_public_key = Some(key);
    }
    config
}

/// Applies overrides from the process environment.
#[must_use]
pub fn apply_overrides(config: StorefrontConfig) -> StorefrontConfig {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Loads the full application configuration: the TOML file named by
/// `STOREFRONT_CONFIG` (or `storefront.toml`) with environment overrides on top.
pub fn load_app_configuration() -> Result<StorefrontConfig> {
    let path = std::env::var(STOREFRONT_CONFIG).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config_or_default(&path)?;
    Ok(apply_overrides(config))
}
