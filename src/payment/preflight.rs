//! Checks run before either provider is invoked.

use crate::api::ApiClient;
use crate::api::purchases::AccessScope;
use crate::core::phone::normalize_phone;
use crate::entities::PaymentOrder;
use crate::errors::{Error, Result};
use tracing::{debug, error, warn};

/// Normalizes the buyer's phone number; no network call is made for bad input.
pub fn normalized_buyer_phone(order: &PaymentOrder) -> Result<String> {
    normalize_phone(&order.buyer_phone).ok_or_else(|| {
        warn!("Rejected buyer phone number before payment");
        Error::InvalidPhoneNumber {
            input: order.buyer_phone.clone(),
        }
    })
}

/// Refuses the attempt when the buyer already holds access to the first item.
///
/// This is a hard gate: an existing entitlement, or a check that could not be
/// completed, stops the attempt before any provider call. A non-OK answer
/// counts as a check that could not be completed, even when its body is JSON.
/// Orders without items skip the check.
pub async fn ensure_no_existing_access(api: &ApiClient, order: &PaymentOrder) -> Result<()> {
    let Some(item) = order.items.first() else {
        return Ok(());
    };

    match api
        .check_access(&order.buyer_email, &item.product_id, AccessScope::Any)
        .await
    {
        Ok(check) if check.has_access => {
            warn!(
                "Buyer already has access to {}, refusing payment",
                item.product_id
            );
            Err(Error::AlreadyHasAccess {
                email: order.buyer_email.clone(),
                product_id: item.product_id.clone(),
            })
        }
        Ok(_) => {
            debug!("No existing access to {}", item.product_id);
            Ok(())
        }
        Err(e) => {
            error!("Error checking access: {}", e);
            Err(Error::AccessCheckFailed {
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{api_client_for, init_test_tracing, sample_order};
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    #[test]
    fn test_bad_phone_is_rejected() {
        let mut order = sample_order();
        order.buyer_phone = "123".to_string();
        assert!(matches!(
            normalized_buyer_phone(&order),
            Err(Error::InvalidPhoneNumber { .. })
        ));
        order.buyer_phone = "024 123 4567".to_string();
        assert_eq!(normalized_buyer_phone(&order).unwrap(), "+233241234567");
    }

    #[tokio::test]
    async fn test_existing_access_blocks() -> Result<()> {
        init_test_tracing();
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/purchases/check-access");
            then.status(200).json_body(json!({ "hasAccess": true }));
        });

        let api = api_client_for(&server);
        let result = ensure_no_existing_access(&api, &sample_order()).await;
        assert!(matches!(result, Err(Error::AlreadyHasAccess { ref product_id, .. }) if product_id == "app-1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_check_is_a_hard_stop() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/purchases/check-access");
            then.status(500).json_body(json!({}));
        });

        let api = api_client_for(&server);
        let result = ensure_no_existing_access(&api, &sample_order()).await;
        assert!(matches!(result, Err(Error::AccessCheckFailed { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_non_ok_answer_without_has_access_blocks() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/purchases/check-access");
            then.status(404).json_body(json!({ "message": "User not found" }));
        });

        let api = api_client_for(&server);
        let result = ensure_no_existing_access(&api, &sample_order()).await;
        assert!(matches!(
            result,
            Err(Error::AccessCheckFailed { ref message }) if message.contains("User not found")
        ));
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn test_order_without_items_skips_check() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/purchases/check-access");
            then.status(200).json_body(json!({ "hasAccess": true }));
        });

        let api = api_client_for(&server);
        let mut order = sample_order();
        order.items.clear();
        ensure_no_existing_access(&api, &order).await?;
        assert_eq!(mock.hits(), 0);
        Ok(())
    }
}
