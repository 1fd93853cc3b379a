//! # boutique-session: Signed-in Storefront Session Layer
//!
//! This crate is what the UI shell talks to. It owns the session state
//! (who is signed in, what is in the cart, which listing is on screen)
//! and drives boutique-store for everything durable.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Boutique Session Layer                             │
//! │                                                                         │
//! │  UI Shell (pages, components)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  boutique-session (THIS CRATE)                  │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐  ┌──────────────┐  ┌─────────────────────┐  │   │
//! │  │   │ Identity     │  │ CartSession  │  │ OrderSubmitter      │  │   │
//! │  │   │ Service      │◄─┤ (serialized  │◄─┤ (submission saga)   │  │   │
//! │  │   │ (who am I)   │  │  mutations)  │  │                     │  │   │
//! │  │   └──────────────┘  └──────────────┘  └─────────────────────┘  │   │
//! │  │           ┌──────────────┐                                     │   │
//! │  │           │ CatalogReader│  retain-last-good listings          │   │
//! │  │           └──────────────┘                                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  boutique-store (SQLite repositories)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`identity`] - Email/password identity and the current session
//! - [`cart`] - The cart cache and its mutation protocol
//! - [`checkout`] - Order submission saga and stale-order sweep
//! - [`catalog`] - Cached catalog listings
//! - [`error`] - Session error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use boutique_session::{CartSession, IdentityService, OrderSubmitter};
//! use boutique_store::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./boutique.db")).await?;
//! let identity = Arc::new(IdentityService::new(db.clone()));
//! let cart = Arc::new(CartSession::new(db.clone(), identity.clone()));
//! let checkout = OrderSubmitter::new(db, identity.clone(), cart.clone());
//!
//! identity.sign_in("aicha@example.com", "secret1").await?;
//! cart.fetch().await?;
//! cart.add(&product_id, 2, "M", "Noir").await?;
//! let receipt = checkout.submit("orange-money", delivery).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod identity;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart::CartSession;
pub use catalog::CatalogReader;
pub use checkout::{OrderReceipt, OrderSubmitter};
pub use error::{SessionError, SessionResult};
pub use identity::{Identity, IdentityService};
