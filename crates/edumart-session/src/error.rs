//! # Session Boundary Error Type
//!
//! Unified error type for operations exposed to the UI adapter.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Session Layer                      │
//! │                                                                         │
//! │  Web UI                       Session crate                             │
//! │  ──────                       ─────────────                             │
//! │                                                                         │
//! │  applyVoucherCode('X')                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Store method                                                    │  │
//! │  │  Result<T, SessionError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Registry miss? ──── CoreError::UnknownVoucherCode ──┐          │  │
//! │  │         │                                            ▼          │  │
//! │  │  Storage error? ──── StoreError::QueryFailed ──── SessionError ─►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The UI receives { code: "VALIDATION_ERROR", message: "..." }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note that cart mutations do NOT use this type: duplicate adds and
//! missing removes are benign `CartMutation` outcomes. `SessionError`
//! covers genuine rejections and infrastructure failures.

use serde::Serialize;

use edumart_core::CoreError;
use edumart_store::StoreError;

/// Error returned from session boundary operations.
///
/// ## Serialization
/// This is what the UI adapter receives when an operation fails:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Unknown voucher code: NOPE99"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for session boundary responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (unknown or malformed code)
    ValidationError,

    /// Durable storage operation failed
    StorageError,

    /// Checkout flow error
    CheckoutError,

    /// Internal error
    Internal,
}

impl SessionError {
    /// Creates a new session error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        SessionError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        SessionError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        SessionError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to session errors.
impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        // Log the actual error but hand the UI a generic message
        tracing::error!("Storage operation failed: {}", err);
        SessionError::new(ErrorCode::StorageError, "Storage operation failed")
    }
}

/// Converts core errors to session errors.
impl From<CoreError> for SessionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownVoucherCode(_) | CoreError::UnknownReferralCode(_) => {
                SessionError::validation(err.to_string())
            }
            CoreError::Validation(e) => SessionError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_maps_to_validation() {
        let err: SessionError = CoreError::UnknownVoucherCode("NOPE99".to_string()).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("NOPE99"));
    }

    #[test]
    fn test_store_error_message_is_generic() {
        let err: SessionError = StoreError::QueryFailed("secret table detail".to_string()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn test_serializes_with_screaming_code() {
        let err = SessionError::validation("bad code");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad code");
    }
}
