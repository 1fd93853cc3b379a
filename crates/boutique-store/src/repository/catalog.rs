//! # Catalog Repository
//!
//! Read access to categories and products, plus the inserts used by the
//! seed binary. Listing queries are the hot path for the storefront: the
//! category menu sorts by name, the product grid sorts newest-first and
//! optionally narrows to a single category.
//!
//! Products carry three JSON TEXT list columns (`gallery`, `sizes`,
//! `colors`). A row whose JSON fails to parse is surfaced as
//! [`StoreError::CorruptColumn`] rather than silently dropped.

use boutique_core::{Category, Money, Product};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::repository::{decode_json, encode_json};

/// Repository for catalog reads and seed-time writes.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Lists every category, sorted by display name.
    pub async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, slug, description, image_url, created_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(category_from_row).collect()
    }

    /// Lists products newest-first, optionally filtered to one category.
    pub async fn list_products(&self, category_id: Option<&str>) -> StoreResult<Vec<Product>> {
        let rows = match category_id {
            Some(cid) => {
                sqlx::query(
                    r#"
                    SELECT id, name, slug, description, price, category_id,
                           image_url, gallery, sizes, colors, stock, featured, created_at
                    FROM products
                    WHERE category_id = ?1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(cid)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, name, slug, description, price, category_id,
                           image_url, gallery, sizes, colors, stock, featured, created_at
                    FROM products
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(count = rows.len(), "listed products");
        rows.iter().map(product_from_row).collect()
    }

    /// Fetches one product by id.
    pub async fn get_product(&self, id: &str) -> StoreResult<Product> {
        let row = sqlx::query(
            r#"
            SELECT id, name, slug, description, price, category_id,
                   image_url, gallery, sizes, colors, stock, featured, created_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("Product", id))?;

        product_from_row(&row)
    }

    /// Counts catalog products. Used by the seed binary to avoid reseeding.
    pub async fn count_products(&self) -> StoreResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }

    // ========================================================================
    // Writes (seed path)
    // ========================================================================

    pub async fn insert_category(&self, category: &Category) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, description, image_url, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&category.image_url)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, slug, description, price, category_id,
                                  image_url, gallery, sizes, colors, stock, featured, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.price.francs())
        .bind(&product.category_id)
        .bind(&product.image_url)
        .bind(encode_json("gallery", &product.gallery)?)
        .bind(encode_json("sizes", &product.sizes)?)
        .bind(encode_json("colors", &product.colors)?)
        .bind(product.stock)
        .bind(product.featured)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn category_from_row(row: &SqliteRow) -> StoreResult<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn product_from_row(row: &SqliteRow) -> StoreResult<Product> {
    let gallery: String = row.try_get("gallery")?;
    let sizes: String = row.try_get("sizes")?;
    let colors: String = row.try_get("colors")?;

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        price: Money::from_francs(row.try_get::<i64, _>("price")?),
        category_id: row.try_get("category_id")?,
        image_url: row.try_get("image_url")?,
        gallery: decode_json("gallery", &gallery)?,
        sizes: decode_json("sizes", &sizes)?,
        colors: decode_json("colors", &colors)?,
        stock: row.try_get("stock")?,
        featured: row.try_get("featured")?,
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
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn test_category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            description: None,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    fn test_product(name: &str, price: i64, category_id: Option<&str>) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            description: None,
            price: Money::from_francs(price),
            category_id: category_id.map(String::from),
            image_url: Some(format!("/images/{name}.jpg")),
            gallery: vec![],
            sizes: vec!["S".into(), "M".into(), "L".into()],
            colors: vec!["Noir".into(), "Blanc".into()],
            stock: 10,
            featured: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_categories_sorted_by_name() {
        let db = test_db().await;
        let repo = db.catalog();

        repo.insert_category(&test_category("Robes")).await.unwrap();
        repo.insert_category(&test_category("Accessoires")).await.unwrap();
        repo.insert_category(&test_category("Chemises")).await.unwrap();

        let names: Vec<String> = repo
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Accessoires", "Chemises", "Robes"]);
    }

    #[tokio::test]
    async fn test_product_round_trip_preserves_lists() {
        let db = test_db().await;
        let repo = db.catalog();

        let product = test_product("Chemise Wax", 15_000, None);
        repo.insert_product(&product).await.unwrap();

        let found = repo.get_product(&product.id).await.unwrap();
        assert_eq!(found.name, "Chemise Wax");
        assert_eq!(found.price, Money::from_francs(15_000));
        assert_eq!(found.sizes, vec!["S", "M", "L"]);
        assert_eq!(found.colors, vec!["Noir", "Blanc"]);
    }

    #[tokio::test]
    async fn test_list_products_filters_by_category() {
        let db = test_db().await;
        let repo = db.catalog();

        let cat = test_category("Robes");
        repo.insert_category(&cat).await.unwrap();
        repo.insert_product(&test_product("Robe Pagne", 25_000, Some(&cat.id)))
            .await
            .unwrap();
        repo.insert_product(&test_product("Sac Cuir", 30_000, None))
            .await
            .unwrap();

        let all = repo.list_products(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let filtered = repo.list_products(Some(&cat.id)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Robe Pagne");
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let db = test_db().await;
        let err = db.catalog().get_product("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
