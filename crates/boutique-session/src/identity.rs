//! # Identity Service
//!
//! Email/password identity for the storefront session. Holds the
//! currently signed-in identity behind an async `RwLock`; every other
//! session collaborator asks this service who is acting.
//!
//! ## Security Notes
//!
//! - Passwords are Argon2id-hashed before they reach the store.
//! - Sign-in runs the verifier even when the email is unknown, and
//!   returns the same `InvalidCredentials` for a missing account and a
//!   wrong password.
//! - Emails are normalized to lowercase so `Aicha@…` and `aicha@…` are
//!   one account.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use boutique_core::validation::{validate_email, validate_password};
use boutique_store::{Database, UserRecord};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};

/// The signed-in user as seen by the rest of the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Owns the current-session identity and the credential flows.
pub struct IdentityService {
    db: Database,
    current: RwLock<Option<Identity>>,
}

impl IdentityService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            current: RwLock::new(None),
        }
    }

    // ========================================================================
    // Credential flows
    // ========================================================================

    /// Creates an account and signs it in.
    pub async fn sign_up(&self, email: &str, password: &str) -> SessionResult<Identity> {
        let email = email.trim().to_lowercase();
        validate_email(&email)?;
        validate_password(password)?;

        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        match self.db.accounts().insert_user(&record).await {
            Ok(()) => {}
            Err(boutique_store::StoreError::UniqueViolation { .. }) => {
                return Err(SessionError::EmailTaken);
            }
            Err(e) => return Err(e.into()),
        }

        let identity = Identity {
            user_id: record.id,
            email,
            signed_in_at: Utc::now(),
        };
        *self.current.write().await = Some(identity.clone());

        info!(user_id = %identity.user_id, "account created");
        Ok(identity)
    }

    /// Verifies credentials and signs the account in.
    pub async fn sign_in(&self, email: &str, password: &str) -> SessionResult<Identity> {
        let email = email.trim().to_lowercase();

        let record = self.db.accounts().find_by_email(&email).await?;
        let verified = match &record {
            Some(user) => verify_password(password, &user.password_hash),
            // Burn a verification anyway so unknown emails take as long
            // as wrong passwords.
            None => {
                let _ = verify_password(password, DUMMY_HASH);
                false
            }
        };

        let user = match (record, verified) {
            (Some(user), true) => user,
            _ => return Err(SessionError::InvalidCredentials),
        };

        let identity = Identity {
            user_id: user.id,
            email: user.email,
            signed_in_at: Utc::now(),
        };
        *self.current.write().await = Some(identity.clone());

        info!(user_id = %identity.user_id, "signed in");
        Ok(identity)
    }

    /// Clears the current identity. Signing out while signed out is a
    /// no-op.
    pub async fn sign_out(&self) {
        let mut current = self.current.write().await;
        if let Some(identity) = current.take() {
            info!(user_id = %identity.user_id, "signed out");
        }
    }

    /// The currently signed-in identity, if any.
    pub async fn current(&self) -> Option<Identity> {
        self.current.read().await.clone()
    }
}

// ============================================================================
// Password helpers
// ============================================================================

/// A valid Argon2id hash of an unguessable value, verified against when
/// the email is unknown to equalize sign-in timing.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2Vzc2lvbi1kdW1teQ$kVNUZ9jraEZnYhW1uqzXkVmNoEEk/VxZyrKRJjW5JrM";

fn hash_password(password: &str) -> SessionResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SessionError::HashingFailed(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use boutique_store::DbConfig;

    async fn test_service() -> IdentityService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        IdentityService::new(db)
    }

    #[tokio::test]
    async fn test_sign_up_sets_current_identity() {
        let service = test_service().await;

        let identity = service.sign_up("aicha@example.com", "secret1").await.unwrap();
        assert_eq!(identity.email, "aicha@example.com");
        assert_eq!(service.current().await, Some(identity));
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email_is_taken() {
        let service = test_service().await;

        service.sign_up("dupe@example.com", "secret1").await.unwrap();
        let err = service.sign_up("dupe@example.com", "secret2").await.unwrap_err();
        assert!(matches!(err, SessionError::EmailTaken));
    }

    #[tokio::test]
    async fn test_sign_in_round_trip() {
        let service = test_service().await;
        service.sign_up("aicha@example.com", "secret1").await.unwrap();
        service.sign_out().await;
        assert_eq!(service.current().await, None);

        let identity = service.sign_in("aicha@example.com", "secret1").await.unwrap();
        assert_eq!(identity.email, "aicha@example.com");
    }

    #[tokio::test]
    async fn test_sign_in_failures_are_indistinguishable() {
        let service = test_service().await;
        service.sign_up("aicha@example.com", "secret1").await.unwrap();
        service.sign_out().await;

        let wrong_password = service.sign_in("aicha@example.com", "nope").await.unwrap_err();
        let unknown_email = service.sign_in("ghost@example.com", "nope").await.unwrap_err();

        assert!(matches!(wrong_password, SessionError::InvalidCredentials));
        assert!(matches!(unknown_email, SessionError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(service.current().await, None);
    }

    #[tokio::test]
    async fn test_email_is_case_insensitive() {
        let service = test_service().await;
        service.sign_up("Aicha@Example.com", "secret1").await.unwrap();
        service.sign_out().await;

        let identity = service.sign_in("aicha@example.com", "secret1").await.unwrap();
        assert_eq!(identity.email, "aicha@example.com");
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let service = test_service().await;
        let err = service.sign_up("aicha@example.com", "abc").await.unwrap_err();
        assert!(matches!(err, SessionError::Core(_)));
    }
}
