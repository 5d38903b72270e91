//! Custom `validator` rules shared by request DTOs.

use validator::ValidationError;

use crate::domain::types::{MIN_RELEASE_YEAR, release_year_in_range};

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub fn alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric"))
    }
}

/// Accepts `MIN_RELEASE_YEAR` through five years past the current one.
pub fn valid_release_year(year: i32) -> Result<(), ValidationError> {
    if release_year_in_range(year) {
        Ok(())
    } else {
        Err(ValidationError::new("release_year"))
    }
}

/// Search filters only bound the year from below.
pub fn searchable_release_year(year: i32) -> Result<(), ValidationError> {
    if year >= MIN_RELEASE_YEAR {
        Ok(())
    } else {
        Err(ValidationError::new("release_year"))
    }
}
