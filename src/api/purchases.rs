//! Purchase, entitlement and provisioning endpoints.

use super::ApiClient;
use crate::entities::purchase::{
    AccessCheck, AccessRequest, MessageResponse, ProvisioningRequest, PurchaseRequest,
};
use crate::errors::Result;
use serde_json::Value;
use tracing::info;

/// Which entitlements an access check considers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessScope {
    /// Any entitlement, trial and free access included
    #[default]
    Any,
    /// Paid purchases only (`mode=buy`)
    Purchase,
}

impl ApiClient {
    /// `GET /purchases/check-access`
    pub async fn check_access(
        &self,
        email: &str,
        product_id: &str,
        scope: AccessScope,
    ) -> Result<AccessCheck> {
        let mut query = vec![("email", email), ("productId", product_id)];
        if scope == AccessScope::Purchase {
            query.push(("mode", "buy"));
        }
        self.get_json("/purchases/check-access", &query, "Unable to verify account status")
            .await
    }

    /// `POST /purchases/trial`
    pub async fn request_trial(&self, request: &AccessRequest) -> Result<MessageResponse> {
        info!("Requesting trial of {}", request.product_id);
        self.post_json("/purchases/trial", request, "Failed to submit trial request")
            .await
    }

    /// `POST /purchases/free-access`
    pub async fn request_free_access(&self, request: &AccessRequest) -> Result<MessageResponse> {
        info!("Requesting free access to {}", request.product_id);
        self.post_json("/purchases/free-access", request, "Failed to submit request")
            .await
    }

    /// `POST /purchases`
    pub async fn record_purchase(&self, request: &PurchaseRequest) -> Result<Value> {
        info!(
            "Recording purchase of {} with reference {}",
            request.product_id, request.reference
        );
        self.post_json("/purchases", request, "Failed to record purchase")
            .await
    }

    /// `POST /app-provisioning`
    pub async fn provision_app(&self, request: &ProvisioningRequest) -> Result<MessageResponse> {
        info!("Provisioning {}", request.product_id);
        self.post_json("/app-provisioning", request, "Failed to provision app")
            .await
    }
}
