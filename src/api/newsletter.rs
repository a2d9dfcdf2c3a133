//! Newsletter subscription endpoints.

use super::ApiClient;
use crate::entities::inquiry::{SubscribeResponse, Unsubscribe};
use crate::entities::purchase::MessageResponse;
use crate::errors::Result;
use serde_json::json;
use tracing::info;

impl ApiClient {
    /// `POST /newsletter/subscribe`
    pub async fn subscribe(&self, email: &str) -> Result<SubscribeResponse> {
        info!("Subscribing to newsletter");
        self.post_json("/newsletter/subscribe", &json!({ "email": email }), "Failed to subscribe")
            .await
    }

    /// `POST /newsletter/unsubscribe` with a token from an email link, or
    /// `POST /newsletter/unsubscribe-by-email` with a typed address.
    pub async fn unsubscribe(&self, request: &Unsubscribe) -> Result<MessageResponse> {
        let (path, body) = match request {
            Unsubscribe::Token(token) => ("/newsletter/unsubscribe", json!({ "token": token })),
            Unsubscribe::Email(email) => {
                ("/newsletter/unsubscribe-by-email", json!({ "email": email }))
            }
        };
        info!("Unsubscribing via {}", path);
        self.post_json(path, &body, "Failed to unsubscribe").await
    }
}
