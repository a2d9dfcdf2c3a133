/// Storefront configuration loading from storefront.toml
pub mod app;

/// Environment variable overrides
pub mod env;

pub use app::{
    ApiConfig, CacheConfig, ContentConfig, PaymentsConfig, StorefrontConfig, load_config,
};
pub use env::load_app_configuration;
