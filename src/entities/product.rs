//! Product entity - A software product listed in the marketplace.
//!
//! Products are authored in the content store and read through the projections
//! in [`crate::content::queries`]. Prices are in GHS. A product may carry a
//! promotion and a per-platform availability map used by the access card.

use super::{null_as_default, sector::Sector};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[allow(clippy::unwrap_used)]
static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtu\.be/|youtube\.com/(?:embed/|v/|watch\?v=|watch\?.+&v=))([^&?]+)").unwrap()
});

/// Product record as projected from the content store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Content-store document id
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name of the product
    pub title: String,
    /// URL slug used by the item detail route
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    /// List price in GHS; kept even when the product is free
    #[serde(default)]
    pub price: Option<f64>,
    /// Free products resolve to an effective price of 0 whatever `price` says
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_free: bool,
    /// Free access still needs an account provisioned by the backend
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_account: bool,
    /// A trial can be requested for this product
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_trial_usage: bool,
    /// One-line summary shown on cards; searched by the marketplace
    #[serde(default)]
    pub short_description: Option<String>,
    /// Portable-text blocks, rendered by the shell
    #[serde(default)]
    pub description: Option<serde_json::Value>,
    /// Resolved asset URL of the main image
    #[serde(default)]
    pub main_image: Option<String>,
    /// Resolved asset URLs of the screenshots
    #[serde(default, deserialize_with = "null_as_default")]
    pub screenshots: Vec<String>,
    /// Industries the product is listed under
    #[serde(default, deserialize_with = "null_as_default")]
    pub sectors: Vec<Sector>,
    /// Optional discount
    #[serde(default)]
    pub promotion: Option<Promotion>,
    /// Where the product can be installed or opened
    #[serde(default)]
    pub platforms: Option<Platforms>,
    /// Optional demo video
    #[serde(default)]
    pub video: Option<Video>,
    /// Feature bullets, rendered by the shell
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<serde_json::Value>,
    /// Free-form tags
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Publication date, used by the date sorts
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Unpublished products are never listed
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_published: bool,
}

impl Product {
    /// Whether any of the product's sectors has the given slug.
    #[must_use]
    pub fn in_sector(&self, slug: &str) -> bool {
        self.sectors.iter().any(|s| s.slug == slug)
    }
}

/// Promotion embedded in a product.
///
/// `is_active` is authored in the content store and taken as-is; the start/end
/// dates are informational here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Editor toggle for showing a promotion at all
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_promotion: bool,
    /// Promotional price in GHS
    #[serde(default)]
    pub discount_price: Option<f64>,
    /// Whether the promotion currently applies
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    /// Announced start
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Announced end
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl Promotion {
    /// Discount price when the promotion applies, `None` otherwise.
    #[must_use]
    pub fn applicable_discount(&self) -> Option<f64> {
        if self.has_promotion && self.is_active {
            self.discount_price
        } else {
            None
        }
    }
}

/// Per-platform availability of a product
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platforms {
    /// Desktop builds
    #[serde(default)]
    pub desktop: Option<DesktopPlatforms>,
    /// Mobile builds
    #[serde(default)]
    pub mobile: Option<MobilePlatforms>,
    /// Hosted web app
    #[serde(default)]
    pub web: Option<WebPlatform>,
}

/// Desktop builds per operating system
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopPlatforms {
    /// Windows build
    #[serde(default)]
    pub windows: Option<DesktopBuild>,
    /// macOS build
    #[serde(default)]
    pub macos: Option<DesktopBuild>,
    /// Linux build
    #[serde(default)]
    pub linux: Option<DesktopBuild>,
}

/// A downloadable desktop build
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesktopBuild {
    /// Whether the build is offered
    #[serde(default, deserialize_with = "null_as_default")]
    pub available: bool,
    /// Installer URL
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Mobile builds per store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobilePlatforms {
    /// Android build
    #[serde(default)]
    pub android: Option<AndroidBuild>,
    /// iOS build
    #[serde(default)]
    pub ios: Option<IosBuild>,
}

/// Android distribution
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidBuild {
    /// Whether the build is offered
    #[serde(default, deserialize_with = "null_as_default")]
    pub available: bool,
    /// Play Store listing
    #[serde(default)]
    pub play_store_url: Option<String>,
    /// Direct APK download
    #[serde(default)]
    pub apk_url: Option<String>,
}

/// iOS distribution
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosBuild {
    /// Whether the build is offered
    #[serde(default, deserialize_with = "null_as_default")]
    pub available: bool,
    /// App Store listing
    #[serde(default)]
    pub app_store_url: Option<String>,
}

/// Hosted web app
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPlatform {
    /// Whether the web app is offered
    #[serde(default, deserialize_with = "null_as_default")]
    pub available: bool,
    /// Web app URL
    #[serde(default)]
    pub web_app_url: Option<String>,
}

/// Product demo video
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Video URL, YouTube or self-hosted
    pub url: String,
    /// `youtube` or `custom`; absent means custom unless the URL is a YouTube link
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl Video {
    /// Embeddable player URL for YouTube videos, `None` for self-hosted ones.
    #[must_use]
    pub fn youtube_embed_url(&self) -> Option<String> {
        YOUTUBE_ID
            .captures(&self.url)
            .and_then(|c| c.get(1))
            .map(|id| format!("https://www.youtube.com/embed/{}", id.as_str()))
    }
}

/// Lightweight product listing used by the review form's app picker
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppListItem {
    /// Content-store document id
    #[serde(rename = "_id")]
    pub id: String,
    /// Product title
    pub title: String,
}
