use crate::core::validation::ValidationErrors;
use thiserror::Error;

/// Errors raised by the storefront core.
///
/// Variants follow the checkout error taxonomy: local validation failures never
/// reach the network, pre-flight rejections stop an attempt before any charge,
/// and transport/API failures carry enough detail for a user-facing message.
/// Outcomes that happen after a provider's hosted UI opened are not errors; see
/// [`crate::payment::PaymentOutcome`].
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unreadable configuration, or a provider that is not set up
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// Form input failed validation; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Phone number that no provider accepts
    #[error("Invalid phone number: {input:?}")]
    InvalidPhoneNumber {
        /// Number as typed
        input: String,
    },

    /// The buyer already holds an entitlement to the product
    #[error("{email} already has access to product {product_id}")]
    AlreadyHasAccess {
        /// Buyer email the check ran for
        email: String,
        /// Product already granted
        product_id: String,
    },

    /// The entitlement check could not be completed
    #[error("Unable to verify account status: {message}")]
    AccessCheckFailed {
        /// Underlying failure
        message: String,
    },

    /// A second pay action while one is in flight
    #[error("A payment is already being processed for this checkout")]
    PaymentInProgress,

    /// No product with this id or slug
    #[error("Product not found: {key}")]
    ProductNotFound {
        /// Id or slug that was looked up
        key: String,
    },

    /// Non-OK answer from the backend or the content store
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Body message, or the endpoint's default
        message: String,
    },

    /// OK answer whose body could not be used
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What was wrong with the body
        message: String,
    },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Malformed configuration file
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// File access failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Text the shell shows in a toast or dialog for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors
                .iter()
                .next()
                .map_or_else(|| "Please check the form".to_string(), |(_, m)| m.to_string()),
            Self::InvalidPhoneNumber { .. } => "Enter a valid phone number to continue.".to_string(),
            Self::AlreadyHasAccess { .. } => {
                "You already have access to this app with this email.".to_string()
            }
            Self::AccessCheckFailed { .. } => {
                "Unable to verify account status. Please try again.".to_string()
            }
            Self::PaymentInProgress => "Your payment is still being processed.".to_string(),
            Self::ProductNotFound { .. } => "This app could not be found.".to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Config { .. } => "Payment is not available right now.".to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_validation_uses_first_field_message() {
        let mut errors = ValidationErrors::new();
        errors.add("city", "City is required");
        errors.add("street", "Street address is required");

        // Fields are ordered by name, so "city" comes first
        assert_eq!(Error::Validation(errors).user_message(), "City is required");
    }

    #[test]
    fn test_user_message_for_api_error_passes_server_message_through() {
        let error = Error::Api {
            status: 409,
            message: "Review already submitted".to_string(),
        };
        assert_eq!(error.user_message(), "Review already submitted");
    }

    #[test]
    fn test_user_message_for_access_gate() {
        let error = Error::AlreadyHasAccess {
            email: "ops@acme.test".to_string(),
            product_id: "app-1".to_string(),
        };
        assert_eq!(
            error.user_message(),
            "You already have access to this app with this email."
        );
    }
}
