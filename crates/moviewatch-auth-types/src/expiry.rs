//! Token lifetime parsing for `JWT_EXPIRES_IN`.
//!
//! Accepts bare seconds (`"900"`) or a number with one of the suffixes
//! `s`, `m`, `h`, `d` (`"15m"`, `"7d"`).

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid token lifetime: {0:?}")]
pub struct InvalidExpiry(pub String);

pub fn parse_expires_in(raw: &str) -> Result<Duration, InvalidExpiry> {
    let value = raw.trim();
    let invalid = || InvalidExpiry(raw.to_owned());

    let (digits, unit) = match value.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&value[..idx], c.to_ascii_lowercase()),
        Some(_) => (value, 's'),
        None => return Err(invalid()),
    };
    let amount: u64 = digits.parse().map_err(|_| invalid())?;
    if amount == 0 {
        return Err(invalid());
    }
    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        _ => return Err(invalid()),
    };
    amount
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}
