//! # Order Submitter
//!
//! Turns the current cart into a persisted order.
//!
//! ## Submission Saga
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Submission Saga                             │
//! │                                                                         │
//! │   validate (identity, lines, payment, delivery)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   insert header (status = pending)          ── Pending                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   batch-insert items (one transaction)      ── ItemsWritten            │
//! │       │                            │                                    │
//! │       │ ok                         │ err                                │
//! │       ▼                            ▼                                    │
//! │   clear cart, return receipt   delete_order (compensation)            │
//! │       │                            │                                    │
//! │       ▼                            ▼                                    │
//! │   Committed                    typed store error, cart intact          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The total is computed from the cached snapshot prices before any write,
//! so concurrent catalog edits cannot change what the customer pays. If
//! even the compensating delete fails, the orphaned header is logged and
//! left for the stale-pending sweep.

use std::sync::Arc;

use boutique_core::{
    cart_total,
    validation::{validate_delivery, validate_payment_method},
    CartLine, CoreError, DeliveryAddress, Money, Order, OrderItem, OrderStatus, PaymentStatus,
};
use boutique_store::Database;
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::cart::CartSession;
use crate::error::SessionResult;
use crate::identity::IdentityService;

/// The terminal "order complete" signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: String,
    pub total: Money,
    pub item_count: usize,
}

/// Submits the session cart as an order.
pub struct OrderSubmitter {
    db: Database,
    identity: Arc<IdentityService>,
    cart: Arc<CartSession>,
}

impl OrderSubmitter {
    pub fn new(db: Database, identity: Arc<IdentityService>, cart: Arc<CartSession>) -> Self {
        Self { db, identity, cart }
    }

    /// Submits the current cart. On success the cart is cleared and the
    /// receipt returned; on any failure the cart is left as it was.
    ///
    /// The cart lock is held for the whole submission, so a concurrent
    /// add or quantity change lands either before the order snapshot or
    /// after the clear, never in between.
    pub async fn submit(
        &self,
        payment_method: &str,
        delivery: DeliveryAddress,
    ) -> SessionResult<OrderReceipt> {
        let identity = self
            .identity
            .current()
            .await
            .ok_or(CoreError::Unauthenticated)?;

        let mut cache = self.cart.checkout_guard().await;

        let lines = cache.clone();
        if lines.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let payment_method = validate_payment_method(payment_method)?;
        validate_delivery(&delivery)?;

        // Snapshot prices decide the total before anything is written.
        let total = cart_total(&lines);

        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: identity.user_id.clone(),
            total_amount: total,
            payment_method,
            payment_status: PaymentStatus::Pending,
            delivery,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        let items = build_items(&order.id, &lines);
        let item_count = items.len();

        self.write_order(&order, &items).await?;

        info!(order_id = %order.id, total = %total, items = item_count, "order submitted");

        self.cart
            .clear_locked(&mut cache, &identity.user_id)
            .await?;

        Ok(OrderReceipt {
            order_id: order.id,
            total,
            item_count,
        })
    }

    /// Deletes pending headers older than `older_than` that never got
    /// their items, the leftovers of an interrupted compensation. Returns
    /// how many were removed.
    pub async fn sweep_stale(&self, older_than: chrono::Duration) -> SessionResult<usize> {
        let stale = self.db.orders().find_stale_pending(older_than).await?;
        for order_id in &stale {
            self.db.orders().delete_order(order_id).await?;
            warn!(%order_id, "swept stale pending order");
        }
        Ok(stale.len())
    }

    /// Header first, then the item batch; a failed batch compensates by
    /// deleting the orphaned header before surfacing the error.
    async fn write_order(&self, order: &Order, items: &[OrderItem]) -> SessionResult<()> {
        self.db.orders().insert_order(order).await?;

        if let Err(batch_err) = self.db.orders().insert_items(items).await {
            match self.db.orders().delete_order(&order.id).await {
                Ok(()) => {
                    warn!(order_id = %order.id, "item batch failed, header rolled back");
                }
                Err(cleanup_err) => {
                    error!(order_id = %order.id, %cleanup_err,
                           "item batch failed and compensation failed, leaving for sweep");
                }
            }
            return Err(batch_err.into());
        }

        Ok(())
    }
}

/// One order item per cart line, copying quantity, size, color, and the
/// snapshot unit price. A line without a snapshot prices at 0 rather than
/// failing the whole submission.
fn build_items(order_id: &str, lines: &[CartLine]) -> Vec<OrderItem> {
    let now = Utc::now();
    lines
        .iter()
        .map(|line| {
            if line.product.is_none() {
                warn!(line_id = %line.id, product_id = %line.product_id,
                      "cart line has no product snapshot, ordering at 0");
            }
            OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.to_string(),
                product_id: Some(line.product_id.clone()),
                quantity: line.quantity,
                size: line.size.clone(),
                color: line.color.clone(),
                unit_price: line.unit_price(),
                created_at: now,
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use boutique_core::{PaymentMethod, Product};
    use boutique_store::{DbConfig, StoreError};

    struct Fixture {
        db: Database,
        identity: Arc<IdentityService>,
        cart: Arc<CartSession>,
        submitter: OrderSubmitter,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let identity = Arc::new(IdentityService::new(db.clone()));
        let cart = Arc::new(CartSession::new(db.clone(), identity.clone()));
        let submitter = OrderSubmitter::new(db.clone(), identity.clone(), cart.clone());
        Fixture {
            db,
            identity,
            cart,
            submitter,
        }
    }

    async fn seed_product(db: &Database, name: &str, price: i64) -> String {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug: format!("{}-{}", name.to_lowercase(), Uuid::new_v4()),
            description: None,
            price: Money::from_francs(price),
            category_id: None,
            image_url: None,
            gallery: vec![],
            sizes: vec!["M".into()],
            colors: vec!["Noir".into()],
            stock: 5,
            featured: false,
            created_at: Utc::now(),
        };
        db.catalog().insert_product(&product).await.unwrap();
        product.id
    }

    fn delivery() -> DeliveryAddress {
        DeliveryAddress {
            name: "Aissatou Diallo".to_string(),
            phone: "+224 620 00 00 00".to_string(),
            address: "Quartier Kipé".to_string(),
            city: "Conakry".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_two_lines_makes_one_order() {
        let f = fixture().await;
        f.identity.sign_up("a@example.com", "secret1").await.unwrap();
        let a = seed_product(&f.db, "Chemise", 15_000).await;
        let b = seed_product(&f.db, "Sac", 30_000).await;

        f.cart.add(&a, 2, "M", "Noir").await.unwrap();
        f.cart.add(&b, 1, "M", "Marron").await.unwrap();

        let receipt = f.submitter.submit("orange-money", delivery()).await.unwrap();
        assert_eq!(receipt.total, Money::from_francs(60_000));
        assert_eq!(receipt.item_count, 2);

        let order = f.db.orders().get_order(&receipt.order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.payment_method, PaymentMethod::OrangeMoney);

        let items = f.db.orders().get_items(&receipt.order_id).await.unwrap();
        assert_eq!(items.len(), 2);

        assert!(f.cart.lines().await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_scenario_visa_double_quantity() {
        let f = fixture().await;
        f.identity.sign_up("a@example.com", "secret1").await.unwrap();
        let p = seed_product(&f.db, "Polo", 10_000).await;

        f.cart.add(&p, 2, "M", "Noir").await.unwrap();
        let receipt = f.submitter.submit("visa", delivery()).await.unwrap();

        assert_eq!(receipt.total, Money::from_francs(20_000));

        let items = f.db.orders().get_items(&receipt.order_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].unit_price, Money::from_francs(10_000));
        assert_eq!(items[0].size, "M");
        assert_eq!(items[0].color, "Noir");

        assert!(f.cart.lines().await.is_empty());
    }

    #[tokio::test]
    async fn test_total_survives_concurrent_price_change() {
        let f = fixture().await;
        f.identity.sign_up("a@example.com", "secret1").await.unwrap();
        let p = seed_product(&f.db, "Robe", 25_000).await;
        f.cart.add(&p, 1, "M", "Rouge").await.unwrap();

        // The catalog price moves after the cart was fetched.
        bump_price(&f.db, &p, 99_000).await;

        let receipt = f.submitter.submit("visa", delivery()).await.unwrap();
        assert_eq!(receipt.total, Money::from_francs(25_000));
    }

    async fn bump_price(db: &Database, product_id: &str, francs: i64) {
        sqlx::query("UPDATE products SET price = ?1 WHERE id = ?2")
            .bind(francs)
            .bind(product_id)
            .execute(db.pool())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let f = fixture().await;
        f.identity.sign_up("a@example.com", "secret1").await.unwrap();

        let err = f.submitter.submit("visa", delivery()).await.unwrap_err();
        assert!(matches!(err, SessionError::Core(CoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_unauthenticated_submit_is_typed() {
        let f = fixture().await;
        let err = f.submitter.submit("visa", delivery()).await.unwrap_err();
        assert!(err.is_unauthenticated());
    }

    #[tokio::test]
    async fn test_unknown_payment_method_is_rejected_before_writes() {
        let f = fixture().await;
        f.identity.sign_up("a@example.com", "secret1").await.unwrap();
        let p = seed_product(&f.db, "Polo", 10_000).await;
        f.cart.add(&p, 1, "M", "Noir").await.unwrap();

        let err = f.submitter.submit("cash", delivery()).await.unwrap_err();
        assert!(matches!(err, SessionError::Core(CoreError::Validation(_))));

        // Nothing was written, the cart is intact.
        let user = f.identity.current().await.unwrap().user_id;
        assert!(f.db.orders().list_for_user(&user).await.unwrap().is_empty());
        assert_eq!(f.cart.lines().await.len(), 1);
    }

    #[tokio::test]
    async fn test_item_failure_compensates_and_keeps_cart() {
        let f = fixture().await;
        f.identity.sign_up("a@example.com", "secret1").await.unwrap();
        let p = seed_product(&f.db, "Polo", 10_000).await;
        f.cart.add(&p, 1, "M", "Noir").await.unwrap();
        let lines = f.cart.lines().await;

        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: f.identity.current().await.unwrap().user_id,
            total_amount: cart_total(&lines),
            payment_method: PaymentMethod::Visa,
            payment_status: PaymentStatus::Pending,
            delivery: delivery(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        // A zero quantity violates the items CHECK constraint, failing the
        // batch after the header landed.
        let mut items = build_items(&order.id, &lines);
        items[0].quantity = 0;

        let err = f.submitter.write_order(&order, &items).await.unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::QueryFailed { .. })));

        // Compensation removed the header; the cart was never cleared.
        assert!(matches!(
            f.db.orders().get_order(&order.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert_eq!(f.cart.lines().await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_add_during_submit_is_never_lost() {
        let f = fixture().await;
        f.identity.sign_up("a@example.com", "secret1").await.unwrap();
        let first = seed_product(&f.db, "Chemise", 10_000).await;
        let late = seed_product(&f.db, "Sac", 30_000).await;
        f.cart.add(&first, 1, "M", "Noir").await.unwrap();

        // The cart lock serializes the racing add against the submission:
        // it lands either before the order snapshot (ordered, cart cleared)
        // or after the clear (left in the cart), never in between.
        let (submit_res, add_res) = tokio::join!(
            f.submitter.submit("visa", delivery()),
            f.cart.add(&late, 1, "M", "Marron"),
        );
        let receipt = submit_res.unwrap();
        add_res.unwrap();

        let ordered = f.db.orders().get_items(&receipt.order_id).await.unwrap();
        let user = f.identity.current().await.unwrap().user_id;
        let remaining = f.db.cart().fetch_for_user(&user).await.unwrap();

        let late_ordered = ordered
            .iter()
            .filter(|i| i.product_id.as_deref() == Some(late.as_str()))
            .count();
        let late_in_cart = remaining.iter().filter(|l| l.product_id == late).count();
        assert_eq!(late_ordered + late_in_cart, 1);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_stale_orphans() {
        let f = fixture().await;
        f.identity.sign_up("a@example.com", "secret1").await.unwrap();
        let p = seed_product(&f.db, "Polo", 10_000).await;
        f.cart.add(&p, 1, "M", "Noir").await.unwrap();

        // A healthy submission plus a manually planted orphan header.
        let receipt = f.submitter.submit("visa", delivery()).await.unwrap();
        let orphan = Order {
            id: Uuid::new_v4().to_string(),
            user_id: f.identity.current().await.unwrap().user_id,
            total_amount: Money::from_francs(1_000),
            payment_method: PaymentMethod::Visa,
            payment_status: PaymentStatus::Pending,
            delivery: delivery(),
            status: OrderStatus::Pending,
            created_at: Utc::now() - chrono::Duration::hours(3),
        };
        f.db.orders().insert_order(&orphan).await.unwrap();

        let swept = f.submitter.sweep_stale(chrono::Duration::hours(1)).await.unwrap();
        assert_eq!(swept, 1);

        assert!(f.db.orders().get_order(&receipt.order_id).await.is_ok());
        assert!(f.db.orders().get_order(&orphan.id).await.is_err());
    }
}
