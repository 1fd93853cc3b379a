//! # boutique-store: Persistence Layer for the Boutique Storefront
//!
//! This crate provides database access for the storefront. It uses SQLite
//! for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Boutique Data Flow                                 │
//! │                                                                         │
//! │  Session Operation (cart.add, checkout.submit)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   boutique-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (catalog.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ CatalogRepo   │    │ 001_initial  │  │   │
//! │  │   │ Connection    │◄───│ CartRepo      │    │   _schema    │  │   │
//! │  │   │ Management    │    │ OrderRepo     │    │   .sql       │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                  ./boutique.db (WAL mode)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations (catalog, cart, order)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use boutique_store::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/boutique.db");
//! let db = Database::new(config).await?;
//!
//! let products = db.catalog().list_products(None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::{AccountRepository, UserRecord};
pub use repository::cart::CartRepository;
pub use repository::catalog::CatalogRepository;
pub use repository::order::OrderRepository;
