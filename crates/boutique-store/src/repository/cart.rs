//! # Cart Repository
//!
//! Cart lines keyed on `(user_id, product_id, size, color)`. Two lines for
//! the same product differ only when size or color differ; writing an
//! existing key REPLACES the stored quantity rather than adding to it.
//!
//! ## Snapshot Join
//!
//! `fetch_for_user` LEFT JOINs the product row so each line carries a
//! display snapshot (name, price, image). A line whose product has been
//! deleted comes back with no snapshot; pricing that line is the caller's
//! concern, not this repository's.

use boutique_core::{CartLine, Money, ProductSnapshot};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Repository for cart lines.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetches every line for a user, oldest first, with product snapshots.
    pub async fn fetch_for_user(&self, user_id: &str) -> StoreResult<Vec<CartLine>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.user_id, c.product_id, c.quantity, c.size, c.color, c.created_at,
                   p.name AS snapshot_name,
                   p.price AS snapshot_price,
                   p.image_url AS snapshot_image
            FROM cart_lines c
            LEFT JOIN products p ON p.id = c.product_id
            WHERE c.user_id = ?1
            ORDER BY c.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id = %user_id, count = rows.len(), "fetched cart");
        rows.iter().map(line_from_row).collect()
    }

    /// Inserts a line, or replaces the quantity of the line already holding
    /// the same `(user_id, product_id, size, color)` key.
    pub async fn upsert_line(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
        size: &str,
        color: &str,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_lines (id, user_id, product_id, quantity, size, color, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(user_id, product_id, size, color)
            DO UPDATE SET quantity = excluded.quantity
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(size)
        .bind(color)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Sets the quantity on an existing line.
    pub async fn update_quantity(&self, line_id: &str, quantity: i64) -> StoreResult<()> {
        let result = sqlx::query("UPDATE cart_lines SET quantity = ?1 WHERE id = ?2")
            .bind(quantity)
            .bind(line_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("CartLine", line_id));
        }
        Ok(())
    }

    /// Removes one line.
    pub async fn delete_line(&self, line_id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE id = ?1")
            .bind(line_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("CartLine", line_id));
        }
        Ok(())
    }

    /// Removes every line a user holds. Deleting an already-empty cart is
    /// not an error.
    pub async fn delete_for_user(&self, user_id: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        debug!(user_id = %user_id, deleted = result.rows_affected(), "cleared cart");
        Ok(result.rows_affected())
    }
}

fn line_from_row(row: &SqliteRow) -> StoreResult<CartLine> {
    let snapshot_name: Option<String> = row.try_get("snapshot_name")?;
    let product = match snapshot_name {
        Some(name) => Some(ProductSnapshot {
            name,
            price: Money::from_francs(row.try_get::<i64, _>("snapshot_price")?),
            image_url: row.try_get("snapshot_image")?,
        }),
        None => None,
    };

    Ok(CartLine {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        size: row.try_get("size")?,
        color: row.try_get("color")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        product,
    })
}
