//! # Session Error Types
//!
//! Error types for session-layer operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Session Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Identity     │  │     Domain      │  │       Store             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  EmailTaken     │  │  Unauthenticated│  │  NotFound               │ │
//! │  │  InvalidCreds   │  │  EmptyCart      │  │  UniqueViolation        │ │
//! │  │  HashingFailed  │  │  Validation     │  │  QueryFailed            │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain errors come up from [`boutique_core::CoreError`]; persistence
//! errors from [`boutique_store::StoreError`]. Both convert via `?`.

use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session error type covering identity, cart, and checkout failures.
#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Identity Errors
    // =========================================================================
    /// An account already exists for this email.
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Sign-in failed. Deliberately the same message whether the email is
    /// unknown or the password is wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Argon2 could not produce or parse a hash.
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Domain rule violation (unauthenticated, empty cart, validation).
    #[error(transparent)]
    Core(#[from] boutique_core::CoreError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] boutique_store::StoreError),
}

impl From<boutique_core::ValidationError> for SessionError {
    fn from(err: boutique_core::ValidationError) -> Self {
        SessionError::Core(err.into())
    }
}

impl SessionError {
    /// True when the operation failed because no user is signed in.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, SessionError::Core(boutique_core::CoreError::Unauthenticated))
    }
}
