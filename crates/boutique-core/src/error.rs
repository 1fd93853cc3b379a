//! # Error Types
//!
//! Domain-specific error types for boutique-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  boutique-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  boutique-store errors (separate crate)                                │
//! │  └── StoreError       - Store collaborator failures                    │
//! │                                                                         │
//! │  boutique-session errors                                               │
//! │  └── SessionError     - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → Frontend           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field names, ids)
//! 3. Errors are enum variants, never String
//! 4. Unauthenticated access and remote failures are explicit variants,
//!    never silent no-ops

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A mutation was attempted without a signed-in identity.
    ///
    /// ## When This Occurs
    /// - Add-to-cart or checkout before sign-in
    /// - The session identity was cleared by sign-out mid-flow
    ///
    /// A silent no-op here would make failure indistinguishable from
    /// success, so this is a typed error.
    #[error("No authenticated user for this operation")]
    Unauthenticated,

    /// Checkout was attempted with an empty cart.
    ///
    /// Rejected before anything is written; a zero-total order is never
    /// created.
    #[error("Cart is empty, nothing to submit")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when input doesn't meet requirements. Used for early
/// validation before any store call is made.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::Unauthenticated.to_string(),
            "No authenticated user for this operation"
        );
        assert_eq!(
            CoreError::EmptyCart.to_string(),
            "Cart is empty, nothing to submit"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "phone".to_string(),
        };
        assert_eq!(err.to_string(), "phone is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "city".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
