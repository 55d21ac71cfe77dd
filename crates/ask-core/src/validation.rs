//! Query input validation
//!
//! Every check runs before the store is touched.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid airport name: {0:?}")]
    InvalidName(String),

    #[error("Invalid country code: {0:?}")]
    InvalidCountry(String),

    #[error("Invalid ICAO code: {0:?} (expected 4 letters)")]
    InvalidIcao(String),
}

/// Letters, whitespace, hyphen, apostrophe and period; at least one character
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::MissingParameter("name"));
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_ascii_whitespace() || matches!(c, '-' | '\'' | '.'));
    if !valid {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Normalize an optional country filter
///
/// An empty value counts as no filter.
pub fn validate_country(country: Option<&str>) -> Result<Option<&str>, ValidationError> {
    match country {
        None | Some("") => Ok(None),
        Some(code) if code.chars().all(|c| c.is_ascii_alphabetic()) => Ok(Some(code)),
        Some(code) => Err(ValidationError::InvalidCountry(code.to_string())),
    }
}

/// Exactly four ASCII letters, any case
pub fn validate_icao(code: &str) -> Result<(), ValidationError> {
    if code.len() == 4 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIcao(code.to_string()))
    }
}
