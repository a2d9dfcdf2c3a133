//! Checkout form business logic.
//!
//! [`CheckoutForm`] is an always-validating form: every field change re-runs the
//! full rule set, so [`CheckoutForm::is_valid`] can gate the pay button at any
//! moment. A valid form turns into the [`PaymentOrder`] handed to a payment
//! strategy.

use crate::core::catalog::effective_price;
use crate::core::validation::{ValidationErrors, optional, require, require_email, require_min_len};
use crate::entities::{
    BillingAddress, CheckoutFormData, CheckoutPayload, OrderItem, OrganizationDetails,
    PaymentMethod, PaymentOrder, Product,
};
use crate::errors::Result;

/// Currency every catalog price is quoted in.
pub const CURRENCY: &str = "GHS";

/// Coarse length gate; the provider-specific normalization is the real check.
pub const MIN_PHONE_LENGTH: usize = 10;

/// Input fields of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutField {
    /// Buyer first name
    FirstName,
    /// Buyer last name
    LastName,
    /// Organization the license is for
    OrganizationName,
    /// Receipt and account email
    OrganizationEmail,
    /// Buyer phone number
    PhoneNumber,
    /// Billing street
    Street,
    /// Billing city
    City,
    /// Billing state or region
    State,
    /// Billing country
    Country,
    /// Optional; never produces an error
    PostalCode,
}

impl CheckoutField {
    /// Key under which this field's error is reported.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstName => "organizationDetails.firstName",
            Self::LastName => "organizationDetails.lastName",
            Self::OrganizationName => "organizationDetails.organizationName",
            Self::OrganizationEmail => "organizationDetails.organizationEmail",
            Self::PhoneNumber => "organizationDetails.phoneNumber",
            Self::Street => "billingAddress.street",
            Self::City => "billingAddress.city",
            Self::State => "billingAddress.state",
            Self::Country => "billingAddress.country",
            Self::PostalCode => "billingAddress.postalCode",
        }
    }
}

/// Checkout form state, re-validated on every change.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    organization: OrganizationDetails,
    billing: BillingAddress,
    postal_code: String,
    payment_method: PaymentMethod,
    errors: ValidationErrors,
}

impl CheckoutForm {
    /// Empty form. It starts out invalid since every required field is blank.
    #[must_use]
    pub fn new() -> Self {
        let mut form = Self::default();
        form.revalidate();
        form
    }

    /// Form prefilled from previously entered data.
    #[must_use]
    pub fn from_data(data: CheckoutFormData) -> Self {
        let postal_code = data.billing_address.postal_code.clone().unwrap_or_default();
        let mut form = Self {
            organization: data.organization_details,
            billing: data.billing_address,
            postal_code,
            payment_method: data.payment_method,
            errors: ValidationErrors::new(),
        };
        form.revalidate();
        form
    }

    /// Updates one field and re-runs validation.
    pub fn set(&mut self, field: CheckoutField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CheckoutField::FirstName => self.organization.first_name = value,
            CheckoutField::LastName => self.organization.last_name = value,
            CheckoutField::OrganizationName => self.organization.organization_name = value,
            CheckoutField::OrganizationEmail => self.organization.organization_email = value,
            CheckoutField::PhoneNumber => self.organization.phone_number = value,
            CheckoutField::Street => self.billing.street = value,
            CheckoutField::City => self.billing.city = value,
            CheckoutField::State => self.billing.state = value,
            CheckoutField::Country => self.billing.country = value,
            CheckoutField::PostalCode => self.postal_code = value,
        }
        self.revalidate();
    }

    /// Selects the provider; the selection never affects validity.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Currently selected provider.
    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Whether the pay button should be enabled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Current field errors.
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Error message currently shown under `field`, if any.
    #[must_use]
    pub fn error_for(&self, field: CheckoutField) -> Option<&str> {
        self.errors.get(field.key())
    }

    /// Normalized form data (trimmed fields, blank postal code dropped), or the field errors.
    pub fn validate(&self) -> Result<CheckoutFormData> {
        let (data, errors) = self.check();
        errors.into_result(data)
    }

    /// Builds the order for `product` at its effective price.
    ///
    /// The purchase description and the items list follow what the providers
    /// show the buyer; the reference seed is left for the caller to set.
    pub fn to_order(&self, product: &Product) -> Result<PaymentOrder> {
        let data = self.validate()?;
        let amount = effective_price(product);
        let items = vec![OrderItem {
            product_id: product.id.clone(),
            title: product.title.clone(),
            price: amount,
        }];
        let details = &data.organization_details;

        Ok(PaymentOrder {
            amount,
            description: format!("Payment for {}", product.title),
            buyer_phone: details.phone_number.clone(),
            buyer_email: details.organization_email.clone(),
            buyer_name: details.full_name(),
            items: items.clone(),
            checkout_payload: CheckoutPayload {
                product_id: product.id.clone(),
                product_title: product.title.clone(),
                amount,
                currency: CURRENCY.to_string(),
                organization_details: data.organization_details.clone(),
                billing_address: data.billing_address.clone(),
                payment_method: data.payment_method,
                items,
            },
            reference_seed: None,
        })
    }

    fn revalidate(&mut self) {
        self.errors = self.check().1;
    }

    fn check(&self) -> (CheckoutFormData, ValidationErrors) {
        let mut errors = ValidationErrors::new();
        let org = &self.organization;
        let bill = &self.billing;

        let organization_details = OrganizationDetails {
            first_name: require(
                &mut errors,
                CheckoutField::FirstName.key(),
                &org.first_name,
                "First Name is required",
            ),
            last_name: require(
                &mut errors,
                CheckoutField::LastName.key(),
                &org.last_name,
                "Last Name is required",
            ),
            organization_name: require(
                &mut errors,
                CheckoutField::OrganizationName.key(),
                &org.organization_name,
                "Organization Name is required",
            ),
            organization_email: require_email(
                &mut errors,
                CheckoutField::OrganizationEmail.key(),
                &org.organization_email,
                "Invalid email address",
            ),
            phone_number: {
                let key = CheckoutField::PhoneNumber.key();
                let phone = require(&mut errors, key, &org.phone_number, "Phone Number is required");
                require_min_len(
                    &mut errors,
                    key,
                    &phone,
                    MIN_PHONE_LENGTH,
                    "Phone number must be at least 10 digits",
                )
            },
        };

        let billing_address = BillingAddress {
            street: require(
                &mut errors,
                CheckoutField::Street.key(),
                &bill.street,
                "Street address is required",
            ),
            city: require(&mut errors, CheckoutField::City.key(), &bill.city, "City is required"),
            state: require(
                &mut errors,
                CheckoutField::State.key(),
                &bill.state,
                "State/Region is required",
            ),
            country: require(
                &mut errors,
                CheckoutField::Country.key(),
                &bill.country,
                "Country is required",
            ),
            postal_code: optional(Some(&self.postal_code)),
        };

        let data = CheckoutFormData {
            organization_details,
            billing_address,
            payment_method: self.payment_method,
        };
        (data, errors)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{paid_product, promoted_product, valid_checkout_form};

    #[test]
    fn test_new_form_is_invalid_with_every_required_field_flagged() {
        let form = CheckoutForm::new();
        assert!(!form.is_valid());
        assert_eq!(form.error_for(CheckoutField::FirstName), Some("First Name is required"));
        assert_eq!(
            form.error_for(CheckoutField::OrganizationEmail),
            Some("Invalid email address")
        );
        assert_eq!(form.error_for(CheckoutField::State), Some("State/Region is required"));
        assert_eq!(form.error_for(CheckoutField::PostalCode), None);
        assert_eq!(form.errors().len(), 9);
    }

    #[test]
    fn test_form_revalidates_on_every_change() {
        let mut form = valid_checkout_form();
        assert!(form.is_valid());

        form.set(CheckoutField::City, "   ");
        assert!(!form.is_valid());
        assert_eq!(form.error_for(CheckoutField::City), Some("City is required"));

        form.set(CheckoutField::City, "Kumasi");
        assert!(form.is_valid());
    }

    #[test]
    fn test_phone_length_is_checked_before_normalization() {
        let mut form = valid_checkout_form();
        form.set(CheckoutField::PhoneNumber, "024123");
        assert_eq!(
            form.error_for(CheckoutField::PhoneNumber),
            Some("Phone number must be at least 10 digits")
        );

        form.set(CheckoutField::PhoneNumber, "");
        assert_eq!(
            form.error_for(CheckoutField::PhoneNumber),
            Some("Phone Number is required")
        );

        form.set(CheckoutField::PhoneNumber, "0241234567");
        assert!(form.is_valid());
    }

    #[test]
    fn test_invalid_email_is_flagged() {
        let mut form = valid_checkout_form();
        form.set(CheckoutField::OrganizationEmail, "ops@acme");
        assert!(matches!(form.validate(), Err(Error::Validation(e)) if e.len() == 1));
    }

    #[test]
    fn test_validate_trims_and_drops_blank_postal_code() {
        let mut form = valid_checkout_form();
        form.set(CheckoutField::FirstName, "  Ama  ");
        form.set(CheckoutField::PostalCode, "   ");
        let data = form.validate().unwrap();
        assert_eq!(data.organization_details.first_name, "Ama");
        assert_eq!(data.billing_address.postal_code, None);

        form.set(CheckoutField::PostalCode, " GA-184 ");
        let data = form.validate().unwrap();
        assert_eq!(data.billing_address.postal_code.as_deref(), Some("GA-184"));
    }

    #[test]
    fn test_from_data_round_trips_valid_data() {
        let data = valid_checkout_form().validate().unwrap();
        let form = CheckoutForm::from_data(data.clone());
        assert!(form.is_valid());
        assert_eq!(form.validate().unwrap(), data);
    }

    #[test]
    fn test_to_order_uses_effective_price() {
        let mut form = valid_checkout_form();
        form.set_payment_method(PaymentMethod::Paystack);
        let product = promoted_product("app-1", "Pharmacy Pro", 500.0, 350.0, true);

        let order = form.to_order(&product).unwrap();
        assert_eq!(order.amount, 350.0);
        assert_eq!(order.description, "Payment for Pharmacy Pro");
        assert_eq!(order.buyer_email, "ops@acme.test");
        assert_eq!(order.buyer_name, "Ama Mensah");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_id, "app-1");
        assert_eq!(order.checkout_payload.currency, "GHS");
        assert_eq!(order.checkout_payload.payment_method, PaymentMethod::Paystack);
        assert_eq!(order.reference_seed, None);
    }

    #[test]
    fn test_to_order_refuses_invalid_form() {
        let form = CheckoutForm::new();
        assert!(matches!(
            form.to_order(&paid_product("app-1", "Ledger", 10.0)),
            Err(Error::Validation(_))
        ));
    }
}
