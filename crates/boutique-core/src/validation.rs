//! # Validation Module
//!
//! Input validation for the storefront core.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript SPA)                                    │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── The core's public contract; callers cannot reach the store        │
//! │  │   with invalid input even if the frontend skipped its checks        │
//! │  └── Delivery details, payment method membership, quantities           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store (SQLite)                                               │
//! │  ├── NOT NULL / UNIQUE / foreign key constraints                       │
//! │  └── Row-level conflict targets                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{DeliveryAddress, PaymentMethod};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0); zero-or-below quantities are handled upstream
///   as removals, never stored
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an entity identifier.
///
/// Every id in the system is a UUID v4 string; ids arrive from the
/// frontend and are checked here before any store call.
///
/// ## Example
/// ```rust
/// use boutique_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates the structured delivery details.
///
/// ## Rules
/// All four fields (name, phone, address, city) are required non-empty
/// strings after trimming.
pub fn validate_delivery(delivery: &DeliveryAddress) -> ValidationResult<()> {
    require_non_empty("name", &delivery.name)?;
    require_non_empty("phone", &delivery.phone)?;
    require_non_empty("address", &delivery.address)?;
    require_non_empty("city", &delivery.city)?;
    Ok(())
}

/// Validates a payment method selection against the closed set.
///
/// ## Example
/// ```rust
/// use boutique_core::validation::validate_payment_method;
///
/// assert!(validate_payment_method("visa").is_ok());
/// assert!(validate_payment_method("cash").is_err());
/// assert!(validate_payment_method("").is_err());
/// ```
pub fn validate_payment_method(raw: &str) -> ValidationResult<PaymentMethod> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "payment_method".to_string(),
        });
    }

    PaymentMethod::from_str(raw)
}

// =============================================================================
// Credential Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must contain a single '@' with non-empty local part and a domain
///   containing a '.'
///
/// Deliberately loose: the identity collaborator is the authority on
/// deliverability, this only rejects obvious garbage early.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a password for sign-up.
///
/// ## Rules
/// - At least 6 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.len() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }

    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn require_non_empty(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
