//! Client references identifying one payment attempt to a provider and the backend.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Prefix used when no seed is supplied, and for every Paystack reference.
pub const DEFAULT_PREFIX: &str = "FMT";

/// Builds a Hubtel client reference: `{seed}_{epochMillis}_{0..=999}`.
///
/// Whitespace is stripped from the seed; a missing or blank seed falls back to
/// [`DEFAULT_PREFIX`].
pub fn hubtel_reference<R: Rng + ?Sized>(
    seed: Option<&str>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> String {
    let base: String = seed
        .map(|s| s.chars().filter(|c| !c.is_whitespace()).collect())
        .filter(|s: &String| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
    let suffix: u16 = rng.gen_range(0..1000);
    format!("{base}_{}_{suffix}", now.timestamp_millis())
}

/// Builds a Paystack reference: `FMT_{epochMillis}`.
#[must_use]
pub fn paystack_reference(now: DateTime<Utc>) -> String {
    format!("{DEFAULT_PREFIX}_{}", now.timestamp_millis())
}
