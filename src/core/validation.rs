//! Field-scoped validation helpers shared by every storefront form.
//!
//! Forms collect all failing fields at once into a [`ValidationErrors`] map keyed by
//! field name, so the shell can show each message next to its input.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

#[allow(clippy::unwrap_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .unwrap()
});

/// Failing fields of a form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for `field`. The first message recorded for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Message recorded for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Whether `field` has an error.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Whether the form is valid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with an error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// Returns `value` when no field failed, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> crate::errors::Result<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(crate::errors::Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Syntactic email check matching what the storefront forms accept.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// Trims `value`, recording `message` under `field` when nothing is left.
pub fn require(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, message);
    }
    trimmed.to_string()
}

/// Trims `value`, recording `message` under `field` when it is shorter than `min` characters.
pub fn require_min_len(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    message: &str,
) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() < min {
        errors.add(field, message);
    }
    trimmed.to_string()
}

/// Trims `value`, recording `message` under `field` when it is not a valid email.
pub fn require_email(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) -> String {
    let trimmed = value.trim();
    if !is_valid_email(trimmed) {
        errors.add(field, message);
    }
    trimmed.to_string()
}

/// Trims an optional field, mapping blank input to `None`.
#[must_use]
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
