//! Buyer phone-number normalization for the payment providers.
//!
//! Both providers want numbers in international form with the Ghana prefix.
//! Buyers type them in three shapes: a bare 9-digit subscriber number, the
//! 10-digit national form with a leading `0`, or the 12-digit form with the
//! country code already present. Separators and a leading `+` are ignored.

/// Ghana's international dialling code.
pub const COUNTRY_CODE: &str = "233";

/// Normalizes a buyer phone number to `+233XXXXXXXXX`.
///
/// Returns `None` for any input that is not one of the three accepted shapes.
#[must_use]
pub fn normalize_phone(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        9 => Some(format!("+{COUNTRY_CODE}{digits}")),
        10 => digits
            .strip_prefix('0')
            .map(|subscriber| format!("+{COUNTRY_CODE}{subscriber}")),
        12 if digits.starts_with(COUNTRY_CODE) => Some(format!("+{digits}")),
        _ => None,
    }
}
