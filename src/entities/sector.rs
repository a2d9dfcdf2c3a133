//! Sector entity - Industry category a product is listed under.
//!
//! Sectors are reference data authored in the content store; the marketplace
//! filters products by sector slug.

use serde::{Deserialize, Serialize};

/// Sector record as projected from the content store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    /// Content-store document id
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name (e.g., "Healthcare", "Retail")
    pub name: String,
    /// Slug used as the marketplace filter value
    pub slug: String,
    /// Optional icon name chosen in the studio
    #[serde(default)]
    pub icon: Option<String>,
}
