//! # Validation Module
//!
//! Input validation for user-entered discount codes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Normalization (trim, uppercase)                                   │
//! │  └── Charset/length rules before any registry lookup                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Registry lookup (discount module)                            │
//! │  └── Unknown codes rejected with no state change                       │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_CODE_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Normalizes and validates a user-entered discount code.
///
/// ## Rules
/// - Trimmed, then uppercased (codes are case-insensitive to the user)
/// - Must not be empty after trimming
/// - Must be at most [`MAX_CODE_LENGTH`] characters
/// - Alphanumeric plus hyphen and underscore only
///
/// ## Example
/// ```rust
/// use edumart_core::validation::normalize_code;
///
/// assert_eq!(normalize_code(" friend10 ").unwrap(), "FRIEND10");
/// assert!(normalize_code("").is_err());
/// assert!(normalize_code("not a code!").is_err());
/// ```
pub fn normalize_code(raw: &str) -> ValidationResult<String> {
    let code = raw.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > MAX_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LENGTH,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_uppercases() {
        assert_eq!(normalize_code("  discount20  ").unwrap(), "DISCOUNT20");
        assert_eq!(normalize_code("Friend10").unwrap(), "FRIEND10");
        assert_eq!(normalize_code("A-B_C1").unwrap(), "A-B_C1");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            normalize_code("   ").unwrap_err(),
            ValidationError::Required { .. }
        ));
    }

    #[test]
    fn test_too_long_rejected() {
        let long = "A".repeat(MAX_CODE_LENGTH + 1);
        assert!(matches!(
            normalize_code(&long).unwrap_err(),
            ValidationError::TooLong { .. }
        ));
    }

    #[test]
    fn test_bad_charset_rejected() {
        assert!(matches!(
            normalize_code("TEN PERCENT").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(normalize_code("CODE!").is_err());
    }
}
