//! Quote requests, the contact form and testimonials.

use super::ApiClient;
use crate::entities::Testimonial;
use crate::entities::inquiry::{ContactMessage, QuoteRequest};
use crate::errors::Result;
use serde_json::Value;
use tracing::info;

impl ApiClient {
    /// `POST /quotes`
    pub async fn submit_quote(&self, request: &QuoteRequest) -> Result<Value> {
        info!("Submitting quote request for {}", request.service_type);
        self.post_json("/quotes", request, "Failed to submit quote request")
            .await
    }

    /// `POST /contact`
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<Value> {
        info!("Sending contact message");
        self.post_json("/contact", message, "Failed to send message")
            .await
    }

    /// `GET /testimonials`
    pub async fn testimonials(&self) -> Result<Vec<Testimonial>> {
        self.get_json("/testimonials", &[], "Failed to fetch testimonials")
            .await
    }
}
