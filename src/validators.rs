/// Input validators for the person resource.
///
/// Keeps obviously hostile or malformed input out of the persistence
/// layer: length limits against oversized payloads, control-character
/// rejection, and a conservative character set for names.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_NAME_LENGTH: usize = 100;
const MAX_ADDRESS_LENGTH: usize = 255;
const MAX_GENDER_LENGTH: usize = 32;

lazy_static! {
    // Letters (any script), spaces, and common name punctuation
    static ref NAME_REGEX: Regex = Regex::new(r"^[\p{L}\p{M}][\p{L}\p{M} .'\-]*$").unwrap();
}

/// Validates a person name field (first or last name).
pub fn is_valid_person_name(field: &str, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }

    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong(field.to_string(), MAX_NAME_LENGTH));
    }

    if !NAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat(field.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates a person address: non-empty, bounded, printable.
pub fn is_valid_address(address: &str) -> Result<String, ValidationError> {
    let trimmed = address.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("address".to_string()));
    }

    if trimmed.len() > MAX_ADDRESS_LENGTH {
        return Err(ValidationError::TooLong(
            "address".to_string(),
            MAX_ADDRESS_LENGTH,
        ));
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat("address".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Validates the gender field: non-empty, bounded, printable.
pub fn is_valid_gender(gender: &str) -> Result<String, ValidationError> {
    let trimmed = gender.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("gender".to_string()));
    }

    if trimmed.len() > MAX_GENDER_LENGTH {
        return Err(ValidationError::TooLong(
            "gender".to_string(),
            MAX_GENDER_LENGTH,
        ));
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat("gender".to_string()));
    }

    Ok(trimmed.to_string())
}

/// True if the value is empty or whitespace-only.
///
/// The auth endpoints use this to reject requests before any
/// credential or token work happens.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
