//! # Error Types
//!
//! Domain-specific error types for edumart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  edumart-core errors (this file)                                       │
//! │  ├── CoreError        - Registry/domain failures                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  edumart-store errors (separate crate)                                 │
//! │  └── StoreError       - Storage operation failures                     │
//! │                                                                         │
//! │  edumart-session errors (boundary)                                     │
//! │  └── SessionError     - What the UI adapter sees (serialized)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → SessionError → UI    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (the offending code, etc.)
//! 3. Errors are enum variants, never String
//! 4. Ordinary cart conditions (duplicate add, missing line) are NOT errors -
//!    they are `CartMutation` outcomes; this file covers genuine rejections

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent rejections the user can act on (fix the code, pick
/// another). They are caught at the session boundary and translated to
/// failure notifications; no state changes when one is returned.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The voucher code does not exist in the registry.
    #[error("Unknown voucher code: {0}")]
    UnknownVoucherCode(String),

    /// The referral code does not exist in the registry.
    #[error("Unknown referral code: {0}")]
    UnknownReferralCode(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements, before any
/// registry lookup or state mutation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (bad characters, malformed code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
