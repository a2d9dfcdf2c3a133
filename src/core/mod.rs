/// Product access options, download links and access request flows
pub mod access;
/// Marketplace filtering, sorting and effective pricing
pub mod catalog;
/// Always-validating checkout form
pub mod checkout;
/// Review, newsletter, quote and contact form validation
pub mod forms;
/// Ghana phone number normalization
pub mod phone;
/// Payment client reference generation
pub mod reference;
/// Field-scoped validation helpers
pub mod validation;
