//! Storefront configuration loading from `storefront.toml`
//!
//! Every section has defaults, so a missing file or a partial one is fine;
//! environment overrides are applied on top by [`super::env`].

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "storefront.toml";

/// Configuration structure representing the entire storefront.toml file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// REST backend
    pub api: ApiConfig,
    /// Headless content store
    pub content: ContentConfig,
    /// Payment providers
    pub payments: PaymentsConfig,
    /// Query cache
    pub cache: CacheConfig,
}

/// REST backend settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Per-request timeout. Unset means requests never time out client-side.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/api".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// `request_timeout_secs` as a duration.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Headless content store settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Project id; when unset every content query resolves to an empty result
    pub project_id: Option<String>,
    /// Dataset name, `production` by default
    pub dataset: String,
    /// Dated API version, e.g. `2024-01-01`
    pub api_version: String,
    /// Read through the CDN edge rather than the live API
    pub use_cdn: bool,
    /// Overrides the host derived from `project_id`
    pub base_url: Option<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            base_url: None,
        }
    }
}

/// Payment provider settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaymentsConfig {
    /// Whether the primary provider is offered at all
    pub hubtel_enabled: bool,
    /// Public key handed to the Paystack popup; the popup refuses to open without it
    pub paystack_public_key: Option<String>,
    /// How long the verified state stays on screen before the flow reports success
    pub verification_display_ms: u64,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            hubtel_enabled: true,
            paystack_public_key: None,
            verification_display_ms: 2000,
        }
    }
}

impl PaymentsConfig {
    /// `verification_display_ms` as a duration.
    #[must_use]
    pub const fn verification_display_delay(&self) -> Duration {
        Duration::from_millis(self.verification_display_ms)
    }
}

/// Query cache settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Extra attempts after the first failed fetch
    pub retries: u32,
    /// Delay before the first retry
    pub retry_delay_ms: u64,
    /// Upper bound on the retry delay
    pub max_retry_delay_ms: u64,
    /// Age after which cached data is refetched on the next read
    pub stale_after_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_delay_ms: 1000,
            max_retry_delay_ms: 30_000,
            stale_after_secs: 60,
        }
    }
}

/// Loads storefront configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid or a field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StorefrontConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads configuration from `path` when it exists, defaults otherwise.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<StorefrontConfig> {
    let path_ref = path.as_ref();
    if path_ref.exists() {
        load_config(path_ref)
    } else {
        tracing::info!(
            "No configuration file at {}, using defaults",
            path_ref.display()
        );
        Ok(StorefrontConfig::default())
    }
}
