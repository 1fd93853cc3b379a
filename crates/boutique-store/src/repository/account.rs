//! # Account Repository
//!
//! Credential rows for the identity service. The store only ever sees the
//! Argon2 hash; plaintext passwords never cross this boundary. Email
//! uniqueness is enforced by the schema and surfaced as
//! [`StoreError::UniqueViolation`].

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::StoreResult;

/// A stored user credential row.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for user credential rows.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_user(&self, user: &UserRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %user.id, "inserted user");
        Ok(())
    }

    /// Looks up a credential row by email. Emails are stored lowercased.
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }
}

fn user_from_row(row: &SqliteRow) -> StoreResult<UserRecord> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    fn test_user(email: &str) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$fake$hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.accounts();

        let user = test_user("aicha@example.com");
        repo.insert_user(&user).await.unwrap();

        let found = repo.find_by_email("aicha@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, user.password_hash);

        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.accounts();

        repo.insert_user(&test_user("dupe@example.com")).await.unwrap();
        let err = repo.insert_user(&test_user("dupe@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }
}
