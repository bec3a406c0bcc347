//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen as reasonable UX limits for names, notes and
//! addresses; the document store has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu item, category, booking contact, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, feedback comments
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, transaction ids, platform labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image references
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Upper bound for table numbers printed on QR cards
pub const MAX_TABLE_NUMBER: u32 = 9999;

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

/// Validate a dine-in table number (positive, bounded).
pub fn validate_table_number(table_number: u32) -> Result<(), AppError> {
    if table_number == 0 || table_number > MAX_TABLE_NUMBER {
        return Err(AppError::validation(format!(
            "Invalid table number: {table_number}"
        )));
    }
    Ok(())
}

/// Validate a non-negative money amount (discount, price).
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!("Invalid {field} amount")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_number_bounds() {
        assert!(validate_table_number(0).is_err());
        assert!(validate_table_number(1).is_ok());
        assert!(validate_table_number(MAX_TABLE_NUMBER).is_ok());
        assert!(validate_table_number(MAX_TABLE_NUMBER + 1).is_err());
    }

    #[test]
    fn amounts_must_be_finite_and_non_negative() {
        assert!(validate_amount(0.0, "discount").is_ok());
        assert!(validate_amount(12.5, "discount").is_ok());
        assert!(validate_amount(-0.01, "discount").is_err());
        assert!(validate_amount(f64::NAN, "discount").is_err());
    }

    #[test]
    fn required_text_rejects_blank() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Margherita", "name", MAX_NAME_LEN).is_ok());
    }
}
