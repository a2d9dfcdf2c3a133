//! Testimonial entity - Landing-page quotes from customers.

use serde::{Deserialize, Serialize};

/// Customer testimonial shown in the landing-page carousel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    /// Quote text
    pub text: String,
    /// Avatar URL
    #[serde(default)]
    pub image_src: Option<String>,
    /// Customer name
    pub name: String,
    /// Handle shown under the name
    #[serde(default)]
    pub username: Option<String>,
    /// Role or company
    #[serde(default)]
    pub role: Option<String>,
    /// Optional star rating
    #[serde(default)]
    pub rating: Option<u8>,
}
