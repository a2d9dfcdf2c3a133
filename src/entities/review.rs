//! Review entity - Customer reviews, either about the company or about one app.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a review is about
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewType {
    /// About the company as a whole
    #[default]
    General,
    /// About one app; `app_id` is required
    AppSpecific,
}

/// Review submission body for `POST /reviews`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewReview {
    /// General or app-specific
    #[serde(rename = "type")]
    pub review_type: ReviewType,
    /// Required for app-specific reviews, omitted otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Star rating, 1 to 5
    pub rating: u8,
    /// Review text
    pub content: String,
    /// Reviewer name
    pub name: String,
    /// Reviewer email, never shown publicly
    pub email: String,
    /// Reviewer company
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Reviewer position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Review as returned by the backend; id and timestamp are server-assigned
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Review {
    /// Backend id
    #[serde(alias = "_id")]
    pub id: String,
    /// General or app-specific
    #[serde(rename = "type", default)]
    pub review_type: ReviewType,
    /// Reviewed app, for app-specific reviews
    #[serde(default)]
    pub app_id: Option<String>,
    /// Star rating, 1 to 5
    pub rating: u8,
    /// Review text
    pub content: String,
    /// Reviewer name
    pub name: String,
    /// Reviewer company
    #[serde(default)]
    pub company: Option<String>,
    /// Reviewer position
    #[serde(default)]
    pub position: Option<String>,
    /// Submission time
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}
