//! # Catalog Reader
//!
//! Read-side caching for the storefront listings. Each refresh replaces
//! the cached listing only when the store call succeeds; on failure the
//! previous listing stays visible and the error is surfaced, so a flaky
//! read never blanks a page the customer is already looking at.
//!
//! The product cache holds exactly one listing at a time, for whichever
//! category filter was last refreshed. Changing the filter means
//! refreshing again.

use boutique_core::{Category, Product};
use boutique_store::Database;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::SessionResult;

/// Cached catalog listings over the store.
pub struct CatalogReader {
    db: Database,
    categories: RwLock<Vec<Category>>,
    products: RwLock<Vec<Product>>,
}

impl CatalogReader {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            categories: RwLock::new(Vec::new()),
            products: RwLock::new(Vec::new()),
        }
    }

    /// Reloads the category listing. The cache keeps its previous value
    /// when the read fails.
    pub async fn refresh_categories(&self) -> SessionResult<()> {
        let fresh = self.db.catalog().list_categories().await?;
        debug!(count = fresh.len(), "categories refreshed");
        *self.categories.write().await = fresh;
        Ok(())
    }

    /// Reloads the product listing, optionally narrowed to one category.
    pub async fn refresh_products(&self, category_id: Option<&str>) -> SessionResult<()> {
        let fresh = self.db.catalog().list_products(category_id).await?;
        debug!(count = fresh.len(), filter = ?category_id, "products refreshed");
        *self.products.write().await = fresh;
        Ok(())
    }

    /// Fetches a single product straight from the store, bypassing the
    /// listing cache. Detail pages want current data.
    pub async fn product(&self, id: &str) -> SessionResult<Product> {
        Ok(self.db.catalog().get_product(id).await?)
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.categories.read().await.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boutique_core::Money;
    use boutique_store::{DbConfig, StoreError};
    use chrono::Utc;
    use uuid::Uuid;

    async fn test_reader() -> (Database, CatalogReader) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let reader = CatalogReader::new(db.clone());
        (db, reader)
    }

    async fn seed_category(db: &Database, name: &str) -> String {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug: format!("{}-{}", name.to_lowercase(), Uuid::new_v4()),
            description: None,
            image_url: None,
            created_at: Utc::now(),
        };
        db.catalog().insert_category(&category).await.unwrap();
        category.id
    }

    async fn seed_product(db: &Database, name: &str, category_id: Option<&str>) {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug: format!("{}-{}", name.to_lowercase(), Uuid::new_v4()),
            description: None,
            price: Money::from_francs(10_000),
            category_id: category_id.map(String::from),
            image_url: None,
            gallery: vec![],
            sizes: vec!["M".into()],
            colors: vec!["Noir".into()],
            stock: 5,
            featured: false,
            created_at: Utc::now(),
        };
        db.catalog().insert_product(&product).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_replaces_cache() {
        let (db, reader) = test_reader().await;
        assert!(reader.categories().await.is_empty());

        seed_category(&db, "Robes").await;
        reader.refresh_categories().await.unwrap();
        assert_eq!(reader.categories().await.len(), 1);

        seed_category(&db, "Chemises").await;
        reader.refresh_categories().await.unwrap();
        assert_eq!(reader.categories().await.len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_products_applies_filter() {
        let (db, reader) = test_reader().await;
        let robes = seed_category(&db, "Robes").await;
        seed_product(&db, "Robe Pagne", Some(&robes)).await;
        seed_product(&db, "Sac Cuir", None).await;

        reader.refresh_products(None).await.unwrap();
        assert_eq!(reader.products().await.len(), 2);

        reader.refresh_products(Some(&robes)).await.unwrap();
        let products = reader.products().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Robe Pagne");
    }

    #[tokio::test]
    async fn test_missing_product_detail_is_typed() {
        let (_db, reader) = test_reader().await;
        let err = reader.product("ghost").await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::SessionError::Store(StoreError::NotFound { .. })
        ));
    }
}
