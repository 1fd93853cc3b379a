//! # Repository Module
//!
//! Repository implementations over the storefront schema.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Session Layer                                                         │
//! │       │                                                                 │
//! │       │  db.cart().fetch_for_user(&user_id)                            │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CartRepository                                                        │
//! │  ├── fetch_for_user(&self, user_id)                                    │
//! │  ├── upsert_line(&self, ...)                                           │
//! │  ├── update_quantity(&self, line_id, qty)                              │
//! │  └── delete_line(&self, line_id)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • The session layer only sees domain types                            │
//! │  • Can swap database implementations                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - Categories and product listings
//! - [`account::AccountRepository`] - Identity credential rows
//! - [`cart::CartRepository`] - Cart lines with the snapshot join
//! - [`order::OrderRepository`] - Order headers and batch item writes

pub mod account;
pub mod cart;
pub mod catalog;
pub mod order;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};

/// Decodes a JSON TEXT column into its domain value.
pub(crate) fn decode_json<T: DeserializeOwned>(column: &str, raw: &str) -> StoreResult<T> {
    serde_json::from_str(raw).map_err(|e| StoreError::corrupt(column, e.to_string()))
}

/// Encodes a domain value into a JSON TEXT column.
pub(crate) fn encode_json<T: Serialize>(column: &str, value: &T) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|e| StoreError::corrupt(column, e.to_string()))
}
