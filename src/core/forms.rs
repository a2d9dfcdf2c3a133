//! Validation for the storefront's secondary forms: reviews, newsletter,
//! quote requests and the contact form.
//!
//! Each `*Draft` holds raw input as typed; `validate` yields the request record
//! sent to the backend or the field-keyed errors.

use crate::core::validation::{ValidationErrors, is_valid_email, optional, require, require_email};
use crate::entities::inquiry::{ContactMessage, QuoteRequest};
use crate::entities::{NewReview, ReviewType};
use crate::errors::Result;

/// Raw review form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    /// General or app-specific
    pub review_type: ReviewType,
    /// App picked in the review form's app select
    pub app_id: Option<String>,
    /// 0 means no star selected yet
    pub rating: u8,
    /// Review text
    pub content: String,
    /// Reviewer name
    pub name: String,
    /// Reviewer email, never shown publicly
    pub email: String,
    /// Optional; blank is omitted
    pub company: String,
    /// Optional; blank is omitted
    pub position: String,
}

impl ReviewDraft {
    /// Draft preset for reviewing one app from its detail page.
    #[must_use]
    pub fn for_app(app_id: impl Into<String>) -> Self {
        Self {
            review_type: ReviewType::AppSpecific,
            app_id: Some(app_id.into()),
            ..Self::default()
        }
    }

    /// Builds the submission body, or the field errors.
    pub fn validate(&self) -> Result<NewReview> {
        let mut errors = ValidationErrors::new();
        if !(1..=5).contains(&self.rating) {
            errors.add("rating", "Please select a rating");
        }
        let app_id = optional(self.app_id.as_deref());
        if self.review_type == ReviewType::AppSpecific && app_id.is_none() {
            errors.add("appId", "Please select an app");
        }
        let review = NewReview {
            review_type: self.review_type,
            app_id: app_id.filter(|_| self.review_type == ReviewType::AppSpecific),
            rating: self.rating,
            content: require(&mut errors, "content", &self.content, "Review is required"),
            name: require(&mut errors, "name", &self.name, "Name is required"),
            email: require_email(&mut errors, "email", &self.email, "Invalid email address"),
            company: optional(Some(&self.company)),
            position: optional(Some(&self.position)),
        };
        errors.into_result(review)
    }
}

/// Validates a newsletter sign-up address, returning it trimmed.
pub fn validate_newsletter_email(email: &str) -> Result<String> {
    let mut errors = ValidationErrors::new();
    let email = require_email(&mut errors, "email", email, "Please enter a valid email address");
    errors.into_result(email)
}

/// Validates the address typed on the unsubscribe page.
pub fn validate_unsubscribe_email(email: &str) -> Result<String> {
    let mut errors = ValidationErrors::new();
    let trimmed = require(&mut errors, "email", email, "Please enter your email address");
    if !trimmed.is_empty() && !is_valid_email(&trimmed) {
        errors.add("email", "Please enter a valid email address");
    }
    errors.into_result(trimmed)
}

/// Raw quote request input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteDraft {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Reply address
    pub email: String,
    /// Primary contact number
    pub contact_number1: String,
    /// Optional second number
    pub contact_number2: String,
    /// Optional company name
    pub company: String,
    /// `website`, `software`, `maintenance`, `revamp` or `other`
    pub service_type: String,
    /// `small`, `medium`, `large` or `enterprise`
    pub budget: String,
    /// What the project is about
    pub description: String,
}

impl QuoteDraft {
    /// Builds the request body, or the field errors.
    pub fn validate(&self) -> Result<QuoteRequest> {
        let mut errors = ValidationErrors::new();
        let request = QuoteRequest {
            first_name: require(&mut errors, "firstName", &self.first_name, "First Name is required"),
            last_name: require(&mut errors, "lastName", &self.last_name, "Last Name is required"),
            email: require_email(&mut errors, "email", &self.email, "Invalid email address"),
            contact_number1: require(
                &mut errors,
                "contactNumber1",
                &self.contact_number1,
                "Contact number is required",
            ),
            contact_number2: optional(Some(&self.contact_number2)),
            company: optional(Some(&self.company)),
            service_type: require(
                &mut errors,
                "serviceType",
                &self.service_type,
                "Please select a service",
            ),
            budget: require(&mut errors, "budget", &self.budget, "Please select a budget range"),
            description: require(
                &mut errors,
                "description",
                &self.description,
                "Project description is required",
            ),
        };
        errors.into_result(request)
    }
}

/// Raw contact form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    /// Sender name
    pub name: String,
    /// Reply address
    pub email: String,
    /// Message body
    pub message: String,
}

impl ContactDraft {
    /// Every field is required; a blank one fails the whole form with one message.
    pub fn validate(&self) -> Result<ContactMessage> {
        let mut errors = ValidationErrors::new();
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            errors.add("form", "Please fill in all fields");
        } else if !is_valid_email(email) {
            errors.add("email", "Invalid email address");
        }
        errors.into_result(ContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }
}
