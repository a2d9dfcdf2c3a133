//! Entity module - Contains the records the storefront exchanges with the content
//! store and the REST backend.
//! Content-store records are read-only snapshots; request records are built
//! fresh per form submission and never persisted client-side.

pub mod checkout;
pub mod inquiry;
pub mod product;
pub mod purchase;
pub mod review;
pub mod sector;
pub mod testimonial;

pub use checkout::{
    BillingAddress, CheckoutFormData, CheckoutPayload, OrderItem, OrganizationDetails,
    PaymentMethod, PaymentOrder, ProviderResponse,
};
pub use product::{AppListItem, Platforms, Product, Promotion, Video};
pub use review::{NewReview, Review, ReviewType};
pub use sector::Sector;
pub use testimonial::Testimonial;

use serde::{Deserialize, Deserializer};

/// Content-store projections return `null` for unset fields; treat those as the default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
