//! # Cart Synchronizer
//!
//! The session cart cache and its mutation protocol.
//!
//! ## State Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cart Mutation Protocol                              │
//! │                                                                         │
//! │   UI call (add / set_quantity / remove)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   lock cache ──────────────────────────────┐                           │
//! │       │                                     │ held for the whole        │
//! │       ▼                                     │ mutate + re-fetch, so     │
//! │   write to store ──err──► cache UNCHANGED   │ concurrent calls          │
//! │       │ ok                (typed error)     │ serialize per session     │
//! │       ▼                                     │                           │
//! │   re-fetch for user                         │                           │
//! │       │                                     │                           │
//! │       ▼                                     │                           │
//! │   cache := fetched rows  ◄──────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is the single source of truth. The cache is only ever
//! replaced wholesale with what the store returned, never patched
//! optimistically; a failed mutation leaves it exactly as it was.
//! `clear` is the one exception to the re-fetch: deleting every row for
//! the user guarantees the result, so the cache is set empty directly.

use std::sync::Arc;

use boutique_core::{
    cart_total,
    validation::{validate_quantity, validate_uuid},
    CartLine, CoreError, Money,
};
use boutique_store::Database;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::error::SessionResult;
use crate::identity::IdentityService;

/// Per-session cart cache over the store.
pub struct CartSession {
    db: Database,
    identity: Arc<IdentityService>,
    lines: Mutex<Vec<CartLine>>,
}

impl CartSession {
    pub fn new(db: Database, identity: Arc<IdentityService>) -> Self {
        Self {
            db,
            identity,
            lines: Mutex::new(Vec::new()),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Snapshot of the cached lines.
    pub async fn lines(&self) -> Vec<CartLine> {
        self.lines.lock().await.clone()
    }

    /// Sum of price x quantity over the cached lines. A line whose product
    /// snapshot is missing counts 0 francs and is logged.
    pub async fn total(&self) -> Money {
        let lines = self.lines.lock().await;
        for line in lines.iter() {
            if line.product.is_none() {
                warn!(line_id = %line.id, product_id = %line.product_id,
                      "cart line has no product snapshot, pricing at 0");
            }
        }
        cart_total(&lines)
    }

    /// Replaces the cache from the store. Signed out means an empty cart,
    /// not an error.
    pub async fn fetch(&self) -> SessionResult<()> {
        let mut cache = self.lines.lock().await;

        let Some(identity) = self.identity.current().await else {
            cache.clear();
            return Ok(());
        };

        *cache = self.db.cart().fetch_for_user(&identity.user_id).await?;
        debug!(count = cache.len(), "cart fetched");
        Ok(())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Adds a line, or replaces the quantity of the line already holding
    /// the same (product, size, color).
    pub async fn add(
        &self,
        product_id: &str,
        quantity: i64,
        size: &str,
        color: &str,
    ) -> SessionResult<()> {
        let mut cache = self.lines.lock().await;

        let identity = self
            .identity
            .current()
            .await
            .ok_or(CoreError::Unauthenticated)?;
        validate_uuid(product_id)?;
        validate_quantity(quantity)?;

        self.db
            .cart()
            .upsert_line(&identity.user_id, product_id, quantity, size, color)
            .await?;

        *cache = self.db.cart().fetch_for_user(&identity.user_id).await?;
        Ok(())
    }

    /// Sets the quantity on an existing line. Zero or below removes the
    /// line instead.
    pub async fn set_quantity(&self, line_id: &str, quantity: i64) -> SessionResult<()> {
        if quantity <= 0 {
            return self.remove(line_id).await;
        }

        let mut cache = self.lines.lock().await;

        let identity = self
            .identity
            .current()
            .await
            .ok_or(CoreError::Unauthenticated)?;
        validate_quantity(quantity)?;

        self.db.cart().update_quantity(line_id, quantity).await?;

        *cache = self.db.cart().fetch_for_user(&identity.user_id).await?;
        Ok(())
    }

    /// Removes one line.
    pub async fn remove(&self, line_id: &str) -> SessionResult<()> {
        let mut cache = self.lines.lock().await;

        let identity = self
            .identity
            .current()
            .await
            .ok_or(CoreError::Unauthenticated)?;

        self.db.cart().delete_line(line_id).await?;

        *cache = self.db.cart().fetch_for_user(&identity.user_id).await?;
        Ok(())
    }

    /// Empties the cart. The delete covers every row the user holds, so
    /// the cache is set empty without a re-fetch round trip.
    pub async fn clear(&self) -> SessionResult<()> {
        let mut cache = self.lines.lock().await;

        let identity = self
            .identity
            .current()
            .await
            .ok_or(CoreError::Unauthenticated)?;

        self.clear_locked(&mut cache, &identity.user_id).await
    }

    // ========================================================================
    // Checkout integration
    // ========================================================================

    /// Locks the cache for a multi-step operation. Checkout holds this
    /// guard across its order writes so no cart mutation can interleave
    /// with a submission.
    pub(crate) async fn checkout_guard(&self) -> MutexGuard<'_, Vec<CartLine>> {
        self.lines.lock().await
    }

    /// Empties the cart under a guard the caller already holds.
    pub(crate) async fn clear_locked(
        &self,
        cache: &mut Vec<CartLine>,
        user_id: &str,
    ) -> SessionResult<()> {
        self.db.cart().delete_for_user(user_id).await?;
        cache.clear();
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
