//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Business rules live here and in the reservation manager, decoupled
//! from the storage mapper.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: location, table number, menu item, role, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, reasons (cancellation reason, event details, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, zone labels, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_oversized() {
        assert!(validate_required_text("ok", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "email", MAX_EMAIL_LEN).is_ok());
        assert!(validate_optional_text(&Some("a@b.c".into()), "email", MAX_EMAIL_LEN).is_ok());
        assert!(
            validate_optional_text(&Some("x".repeat(255)), "email", MAX_EMAIL_LEN).is_err()
        );
    }
}
