//! # Domain Types
//!
//! Core domain types for the Boutique storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  price (FCFA)   │   │  product_id     │   │  total_amount   │       │
//! │  │  sizes, colors  │   │  qty/size/color │   │  delivery       │       │
//! │  │  stock          │   │  snapshot join  │   │  payment_method │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │                 │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────┴────────┐       │
//! │  │    Category     │   │ PaymentMethod   │   │   OrderItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, name, slug │   │  OrangeMoney    │   │  order_id (FK)  │       │
//! │  └─────────────────┘   │  MobileMoney    │   │  unit_price     │       │
//! │                        │  Paycard        │   │  (snapshot)     │       │
//! │                        │  Visa           │   └─────────────────┘       │
//! │                        │  Mastercard     │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `CartLine` carries an optional `ProductSnapshot` joined at read time by
//! the store. An `OrderItem` copies the snapshot price at submission time so
//! later catalog price changes never alter historical orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category shown in the catalog filter.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// URL-friendly identifier.
    pub slug: String,

    /// Optional description.
    pub description: Option<String>,

    /// Banner image reference.
    pub image_url: Option<String>,

    /// When the category was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available in the catalog (read-only to this system).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// URL-friendly identifier.
    pub slug: String,

    /// Product description.
    pub description: Option<String>,

    /// Unit price in whole francs.
    pub price: Money,

    /// Category this product belongs to, if any.
    pub category_id: Option<String>,

    /// Primary image reference.
    pub image_url: Option<String>,

    /// Additional gallery images, in display order.
    pub gallery: Vec<String>,

    /// Available size labels, in display order.
    pub sizes: Vec<String>,

    /// Available color labels, in display order.
    pub colors: Vec<String>,

    /// Stock count (non-negative).
    pub stock: i64,

    /// Whether the product is featured on the home page.
    pub featured: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Checks if the product has stock available.
    ///
    /// ## Note
    /// This gates the add-to-cart button at the presentation boundary only.
    /// Quantity changes on lines already in the cart are not checked
    /// against stock.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Product data denormalized onto a cart line at read time.
///
/// ## Design Notes
/// The store joins this from the products table on every cart fetch; it is
/// display data and total input, never written back. A deleted product leaves
/// the join empty, which totals treat as a zero price.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSnapshot {
    /// Product name at read time.
    pub name: String,

    /// Unit price at read time.
    pub price: Money,

    /// Primary image reference.
    pub image_url: Option<String>,
}

/// One (user, product, size, color) combination in a cart.
///
/// ## Invariants
/// - `quantity` is always positive; a quantity change to zero or below
///   deletes the line instead of storing a non-positive value.
/// - At most one line exists per (user, product, size, color) tuple,
///   enforced by the store's upsert conflict target.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// Line identifier, assigned by the store.
    pub id: String,

    /// Owning user.
    pub user_id: String,

    /// Product reference.
    pub product_id: String,

    /// Quantity in cart (positive).
    pub quantity: i64,

    /// Selected size label.
    pub size: String,

    /// Selected color label.
    pub color: String,

    /// When the line was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Product snapshot joined at read time; `None` when the join is missing.
    pub product: Option<ProductSnapshot>,
}

impl CartLine {
    /// Unit price from the snapshot, zero when the join is missing.
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.product.as_ref().map_or(Money::zero(), |p| p.price)
    }

    /// Line total: snapshot price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// Sums line totals over a cart.
///
/// Pure computation: never fails, never does I/O. A line with a missing
/// product snapshot contributes zero.
pub fn cart_total(lines: &[CartLine]) -> Money {
    lines
        .iter()
        .fold(Money::zero(), |total, line| total + line.line_total())
}

// =============================================================================
// Payment Method
// =============================================================================

/// The closed set of payment methods recognized at checkout.
///
/// Wire values are the kebab-case identifiers the frontend sends:
/// `orange-money`, `mobile-money`, `paycard`, `visa`, `mastercard`.
/// Membership is validated here in the core, not in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Orange Money mobile wallet.
    OrangeMoney,
    /// MTN Mobile Money wallet.
    MobileMoney,
    /// Local Paycard network.
    Paycard,
    /// Visa card.
    Visa,
    /// Mastercard.
    Mastercard,
}

impl PaymentMethod {
    /// All methods, in display order.
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::OrangeMoney,
        PaymentMethod::MobileMoney,
        PaymentMethod::Paycard,
        PaymentMethod::Visa,
        PaymentMethod::Mastercard,
    ];

    /// The wire identifier stored with the order.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::OrangeMoney => "orange-money",
            PaymentMethod::MobileMoney => "mobile-money",
            PaymentMethod::Paycard => "paycard",
            PaymentMethod::Visa => "visa",
            PaymentMethod::Mastercard => "mastercard",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orange-money" => Ok(PaymentMethod::OrangeMoney),
            "mobile-money" => Ok(PaymentMethod::MobileMoney),
            "paycard" => Ok(PaymentMethod::Paycard),
            "visa" => Ok(PaymentMethod::Visa),
            "mastercard" => Ok(PaymentMethod::Mastercard),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            }),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status of an order.
///
/// Orders are created `Pending` and never mutated by this system afterwards;
/// the remaining states exist for back-office tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order received, awaiting confirmation.
    Pending,
    /// Order confirmed by the shop.
    Confirmed,
    /// Order delivered to the customer.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown order status '{s}'"),
            }),
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// Payment capture status of an order.
///
/// Payment capture is out of scope: the method is recorded and the status
/// stays `Pending`. `Paid`/`Failed` exist for the payment collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(ValidationError::InvalidFormat {
                field: "payment_status".to_string(),
                reason: format!("unknown payment status '{s}'"),
            }),
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

// =============================================================================
// Delivery Address
// =============================================================================

/// Structured delivery details captured at checkout.
///
/// All four fields are required non-empty strings, validated in the core
/// before any row is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryAddress {
    /// Recipient full name.
    pub name: String,

    /// Contact phone number.
    pub phone: String,

    /// Street address.
    pub address: String,

    /// City.
    pub city: String,
}

// =============================================================================
// Order
// =============================================================================

/// An order header, created exactly once per checkout submission.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning user.
    pub user_id: String,

    /// Total amount: equals the sum of item price × quantity at submission.
    pub total_amount: Money,

    /// Selected payment method.
    pub payment_method: PaymentMethod,

    /// Payment capture status (stays `Pending`; capture is out of scope).
    pub payment_status: PaymentStatus,

    /// Structured delivery details.
    pub delivery: DeliveryAddress,

    /// Fulfilment status (created `Pending`).
    pub status: OrderStatus,

    /// When the order was submitted.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item of an order.
/// Uses the snapshot pattern to freeze the unit price at submission time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning order.
    pub order_id: String,

    /// Product reference; kept nullable so the item survives a later
    /// product deletion.
    pub product_id: Option<String>,

    /// Quantity ordered.
    pub quantity: i64,

    /// Size label at submission time.
    pub size: String,

    /// Color label at submission time.
    pub color: String,

    /// Unit price at submission time (copied, not referenced).
    pub unit_price: Money,

    /// When the item was written.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Line total: frozen unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
