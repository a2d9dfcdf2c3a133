//! `fmt-storefront` - the client core of the FMT software marketplace.
//!
//! This crate holds every piece of non-visual storefront logic: typed queries
//! against the headless content store, a request-keyed cache, the marketplace
//! filter/sort engine, checkout and access-request validation, and the two
//! payment-provider checkout flows. Rendering, routing and the providers'
//! hosted modals live in the shell that links this crate; the modals are
//! reached through the traits in [`payment`].

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
)]

/// Typed client for the storefront REST backend
pub mod api;
/// Request-keyed cache with retry, exposing loading/error/data states
pub mod cache;
/// Configuration loading from `storefront.toml` and the environment
pub mod config;
/// Read-only queries against the headless content store
pub mod content;
/// Core business logic - catalog filtering, form validation, access rules
pub mod core;
/// Records exchanged with the content store and the backend
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Checkout orchestration over the two payment providers
pub mod payment;
/// Facade the presentation shell talks to
pub mod storefront;

pub use storefront::Storefront;

#[cfg(test)]
pub mod test_utils;
