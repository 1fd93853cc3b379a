//! # Order Repository
//!
//! Order headers and their item rows. Submission writes the header first,
//! then the items as one batch inside a single transaction; the session
//! layer compensates with [`OrderRepository::delete_order`] if the batch
//! fails, so a header never survives without its items.
//!
//! Item rows snapshot the unit price at purchase time. `product_id` is
//! nullable with `ON DELETE SET NULL`: removing a product from the catalog
//! never rewrites purchase history.

use boutique_core::{
    DeliveryAddress, Money, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus,
};
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::repository::{decode_json, encode_json};

/// Repository for order headers and items.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Inserts an order header.
    pub async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total_amount, payment_method, payment_status,
                                delivery_address, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.total_amount.francs())
        .bind(order.payment_method.as_str())
        .bind(order.payment_status.as_str())
        .bind(encode_json("delivery_address", &order.delivery)?)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        debug!(order_id = %order.id, "inserted order header");
        Ok(())
    }

    /// Inserts every item row in one transaction. Either all items land or
    /// none do.
    pub async fn insert_items(&self, items: &[OrderItem]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, size, color,
                                         price, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(&item.size)
            .bind(&item.color)
            .bind(item.unit_price.francs())
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(count = items.len(), "inserted order items");
        Ok(())
    }

    /// Deletes a header (and, via cascade, any items already written).
    /// Compensation path for a failed submission.
    pub async fn delete_order(&self, order_id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Order", order_id));
        }
        debug!(order_id = %order_id, "deleted order");
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn get_order(&self, order_id: &str) -> StoreResult<Order> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, total_amount, payment_method, payment_status,
                   delivery_address, status, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("Order", order_id))?;

        order_from_row(&row)
    }

    /// Lists a user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, total_amount, payment_method, payment_status,
                   delivery_address, status, created_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(order_from_row).collect()
    }

    pub async fn get_items(&self, order_id: &str) -> StoreResult<Vec<OrderItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, product_id, quantity, size, color, price, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(item_from_row).collect()
    }

    /// Finds pending orders older than the given age. These are headers
    /// whose submission never completed and whose cleanup was interrupted.
    pub async fn find_stale_pending(&self, older_than: Duration) -> StoreResult<Vec<String>> {
        let cutoff = Utc::now() - older_than;
        let rows = sqlx::query(
            r#"
            SELECT o.id
            FROM orders o
            LEFT JOIN order_items i ON i.order_id = o.id
            WHERE o.status = ?1 AND o.created_at < ?2
            GROUP BY o.id
            HAVING COUNT(i.id) = 0
            "#,
        )
        .bind(OrderStatus::Pending.as_str())
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("id").map_err(StoreError::from))
            .collect()
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn order_from_row(row: &SqliteRow) -> StoreResult<Order> {
    let payment_method: String = row.try_get("payment_method")?;
    let payment_status: String = row.try_get("payment_status")?;
    let status: String = row.try_get("status")?;
    let delivery_raw: String = row.try_get("delivery_address")?;

    let delivery: DeliveryAddress = decode_json("delivery_address", &delivery_raw)?;

    Ok(Order {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        total_amount: Money::from_francs(row.try_get::<i64, _>("total_amount")?),
        payment_method: payment_method
            .parse::<PaymentMethod>()
            .map_err(|e| StoreError::corrupt("payment_method", e.to_string()))?,
        payment_status: payment_status
            .parse::<PaymentStatus>()
            .map_err(|e| StoreError::corrupt("payment_status", e.to_string()))?,
        delivery,
        status: status
            .parse::<OrderStatus>()
            .map_err(|e| StoreError::corrupt("status", e.to_string()))?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn item_from_row(row: &SqliteRow) -> StoreResult<OrderItem> {
    Ok(OrderItem {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        size: row.try_get("size")?,
        color: row.try_get("color")?,
        unit_price: Money::from_francs(row.try_get::<i64, _>("price")?),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::account::UserRecord;
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_user(db: &Database) -> String {
        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };
        db.accounts().insert_user(&user).await.unwrap();
        user.id
    }

    fn test_order(user_id: &str, total: i64) -> Order {
        Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            total_amount: Money::from_francs(total),
            payment_method: PaymentMethod::OrangeMoney,
            payment_status: PaymentStatus::Pending,
            delivery: DeliveryAddress {
                name: "Aicha Diallo".to_string(),
                phone: "+224 620 00 00 00".to_string(),
                address: "Quartier Kipé".to_string(),
                city: "Conakry".to_string(),
            },
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn test_item(order_id: &str, price: i64, quantity: i64) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            product_id: None,
            quantity,
            size: "M".to_string(),
            color: "Noir".to_string(),
            unit_price: Money::from_francs(price),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_order_round_trip() {
        let db = test_db().await;
        let user = seed_user(&db).await;
        let repo = db.orders();

        let order = test_order(&user, 35_000);
        repo.insert_order(&order).await.unwrap();

        let found = repo.get_order(&order.id).await.unwrap();
        assert_eq!(found.total_amount, Money::from_francs(35_000));
        assert_eq!(found.payment_method, PaymentMethod::OrangeMoney);
        assert_eq!(found.status, OrderStatus::Pending);
        assert_eq!(found.delivery.city, "Conakry");
    }

    #[tokio::test]
    async fn test_items_land_as_one_batch() {
        let db = test_db().await;
        let user = seed_user(&db).await;
        let repo = db.orders();

        let order = test_order(&user, 30_000);
        repo.insert_order(&order).await.unwrap();
        repo.insert_items(&[
            test_item(&order.id, 10_000, 1),
            test_item(&order.id, 10_000, 2),
        ])
        .await
        .unwrap();

        let items = repo.get_items(&order.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit_price, Money::from_francs(10_000));
    }

    #[tokio::test]
    async fn test_delete_order_cascades_to_items() {
        let db = test_db().await;
        let user = seed_user(&db).await;
        let repo = db.orders();

        let order = test_order(&user, 10_000);
        repo.insert_order(&order).await.unwrap();
        repo.insert_items(&[test_item(&order.id, 10_000, 1)]).await.unwrap();

        repo.delete_order(&order.id).await.unwrap();
        assert!(matches!(
            repo.get_order(&order.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert!(repo.get_items(&order.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_pending_only_flags_itemless_headers() {
        let db = test_db().await;
        let user = seed_user(&db).await;
        let repo = db.orders();

        let mut orphan = test_order(&user, 10_000);
        orphan.created_at = Utc::now() - Duration::hours(2);
        repo.insert_order(&orphan).await.unwrap();

        let mut complete = test_order(&user, 20_000);
        complete.created_at = Utc::now() - Duration::hours(2);
        repo.insert_order(&complete).await.unwrap();
        repo.insert_items(&[test_item(&complete.id, 20_000, 1)]).await.unwrap();

        let fresh = test_order(&user, 5_000);
        repo.insert_order(&fresh).await.unwrap();

        let stale = repo.find_stale_pending(Duration::hours(1)).await.unwrap();
        assert_eq!(stale, vec![orphan.id]);
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let db = test_db().await;
        let user = seed_user(&db).await;
        let repo = db.orders();

        let mut older = test_order(&user, 1_000);
        older.created_at = Utc::now() - Duration::minutes(5);
        repo.insert_order(&older).await.unwrap();

        let newer = test_order(&user, 2_000);
        repo.insert_order(&newer).await.unwrap();

        let orders = repo.list_for_user(&user).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, newer.id);
    }
}
