//! Review endpoints.

use super::ApiClient;
use crate::entities::purchase::MessageResponse;
use crate::entities::{NewReview, Review};
use crate::errors::Result;
use tracing::info;

impl ApiClient {
    /// `POST /reviews`
    pub async fn submit_review(&self, review: &NewReview) -> Result<MessageResponse> {
        info!("Submitting {:?} review", review.review_type);
        self.post_json("/reviews", review, "Failed to submit review")
            .await
    }

    /// `GET /reviews/featured`
    pub async fn featured_reviews(&self) -> Result<Vec<Review>> {
        self.get_json("/reviews/featured", &[], "Failed to fetch reviews")
            .await
    }

    /// `GET /reviews/app/:id`. An empty id resolves to no reviews without a request.
    pub async fn app_reviews(&self, app_id: &str) -> Result<Vec<Review>> {
        if app_id.is_empty() {
            return Ok(Vec::new());
        }
        self.get_json(&format!("/reviews/app/{app_id}"), &[], "Failed to fetch reviews")
            .await
    }
}
