//! # Domain Types
//!
//! Core domain types used throughout Flash Inventory.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐         ┌─────────────────┐                       │
//! │  │    Product      │ 1     * │      Sale       │                       │
//! │  │  ─────────────  │◄────────│  ─────────────  │                       │
//! │  │  id (UUID)      │         │  id (UUID)      │                       │
//! │  │  sku (business) │         │  product_id     │                       │
//! │  │  price_cents    │         │  quantity_sold  │                       │
//! │  │  stock_quantity │         │  sale_price     │                       │
//! │  │  min_stock_level│         │  sale_date      │                       │
//! │  └─────────────────┘         └─────────────────┘                       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   NewProduct    │   │  ProductUpdate  │   │   SaleRequest   │       │
//! │  │  (validated     │   │  (partial,      │   │  (id or SKU,    │       │
//! │  │   insert input) │   │   Option fields)│   │   qty, price?)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `id`: UUID v4, immutable, used for relations
//! - `sku`: human-assigned business key, unique

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::{DEFAULT_CATEGORY, DEFAULT_MIN_STOCK_LEVEL};

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Listed price in cents.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock_quantity: i64,

    /// Threshold below which the product is "low stock".
    pub min_stock_level: i64,

    pub category: String,

    /// False once the product has been deleted (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a fresh product row from validated input.
    pub fn new(input: NewProduct, now: DateTime<Utc>) -> Self {
        Product {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            sku: input.sku,
            description: input.description,
            price_cents: input.price.cents(),
            stock_quantity: input.stock_quantity,
            min_stock_level: input.min_stock_level,
            category: input.category,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the listed price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Strictly below the minimum level. Stock equal to the minimum is fine.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity < self.min_stock_level
    }

    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_quantity == 0
    }

    /// Checks if `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }

    /// Case-insensitive substring match against name or SKU.
    ///
    /// ## Example
    /// ```rust
    /// # use chrono::Utc;
    /// # use flash_core::{Money, NewProduct, Product};
    /// let p = Product::new(
    ///     NewProduct::new("Blue Widget", "WID-01", Money::from_cents(999), 10),
    ///     Utc::now(),
    /// );
    /// assert!(p.matches_search("widget"));
    /// assert!(p.matches_search("wid-0"));
    /// assert!(!p.matches_search("gadget"));
    /// ```
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.sku.to_lowercase().contains(&term)
    }

    /// Applies a validated partial update in place.
    pub fn apply_update(&mut self, update: &ProductUpdate, now: DateTime<Utc>) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(sku) = &update.sku {
            self.sku = sku.clone();
        }
        if let Some(price) = update.price {
            self.price_cents = price.cents();
        }
        if let Some(stock) = update.stock_quantity {
            self.stock_quantity = stock;
        }
        if let Some(min) = update.min_stock_level {
            self.min_stock_level = min;
        }
        if let Some(category) = &update.category {
            self.category = category.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        self.updated_at = now;
    }
}

// =============================================================================
// New Product
// =============================================================================

/// Input for creating a product.
///
/// Built with defaults for the optional fields, then checked by
/// [`crate::validation::validate_new_product`] before it reaches storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub price: Money,
    pub stock_quantity: i64,
    pub min_stock_level: i64,
    pub category: String,
    pub description: Option<String>,
}

impl NewProduct {
    /// Creates input with the default category and minimum stock level.
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        price: Money,
        stock_quantity: i64,
    ) -> Self {
        NewProduct {
            name: name.into(),
            sku: sku.into(),
            price,
            stock_quantity,
            min_stock_level: DEFAULT_MIN_STOCK_LEVEL,
            category: DEFAULT_CATEGORY.to_string(),
            description: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn min_stock_level(mut self, level: i64) -> Self {
        self.min_stock_level = level;
        self
    }
}

// =============================================================================
// Product Update
// =============================================================================

/// Partial product update.
///
/// ## Present vs Absent
/// Every field is `None` when the caller did not send it. `description`
/// is doubly optional so that "clear the description" (`Some(None)`) is
/// distinguishable from "leave it alone" (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Money>,
    pub stock_quantity: Option<i64>,
    pub min_stock_level: Option<i64>,
    pub category: Option<String>,
    pub description: Option<Option<String>>,
}

impl ProductUpdate {
    /// True when no field was provided.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.price.is_none()
            && self.stock_quantity.is_none()
            && self.min_stock_level.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }

    /// An update that only sets the stock level.
    pub fn stock(new_stock: i64) -> Self {
        ProductUpdate {
            stock_quantity: Some(new_stock),
            ..Default::default()
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// Product this sale decremented. Not owned; the product may be deleted later.
    pub product_id: String,

    pub quantity_sold: i64,

    /// Unit price charged, in cents.
    pub sale_price_cents: i64,

    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Line total: sale price × quantity.
    #[inline]
    pub fn total(&self) -> Money {
        self.sale_price().multiply_quantity(self.quantity_sold)
    }
}

/// A sale joined with the product's display fields.
///
/// `product_name` and `product_sku` are `None` when the product row no longer
/// exists; the sale itself stays the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleEntry {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub sale: Sale,

    pub product_name: Option<String>,

    pub product_sku: Option<String>,
}

// =============================================================================
// Sale Request
// =============================================================================

/// How a sale names its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRef {
    Id(String),
    Sku(String),
}

impl std::fmt::Display for ProductRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductRef::Id(id) => write!(f, "{}", id),
            ProductRef::Sku(sku) => write!(f, "SKU {}", sku),
        }
    }
}

/// Input for the sale application protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRequest {
    pub product: ProductRef,
    pub quantity: i64,

    /// Caller-supplied unit price. `None` (or zero) means "use the listed price".
    pub sale_price: Option<Money>,

    /// Server assigns "now" when absent.
    pub sale_date: Option<DateTime<Utc>>,
}

impl SaleRequest {
    pub fn new(product: ProductRef, quantity: i64) -> Self {
        SaleRequest {
            product,
            quantity,
            sale_price: None,
            sale_date: None,
        }
    }

    pub fn sale_price(mut self, price: Money) -> Self {
        self.sale_price = Some(price);
        self
    }

    pub fn sale_date(mut self, date: DateTime<Utc>) -> Self {
        self.sale_date = Some(date);
        self
    }
}

/// A sale that has been committed together with its stock decrement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedSale {
    pub sale: Sale,

    /// Product stock right after this sale's decrement.
    pub remaining_stock: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(stock: i64) -> Product {
        Product::new(
            NewProduct::new("Widget", "W1", Money::from_cents(999), stock),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_product_defaults() {
        let p = widget(10);
        assert_eq!(p.min_stock_level, 5);
        assert_eq!(p.category, "General");
        assert!(p.is_active);
        assert!(Uuid::parse_str(&p.id).is_ok());
    }

    #[test]
    fn test_low_stock_is_strict() {
        assert!(!widget(5).is_low_stock());
        assert!(widget(4).is_low_stock());
        assert!(widget(0).is_out_of_stock());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let p = widget(1);
        assert!(p.matches_search("WIDG"));
        assert!(p.matches_search("w1"));
        assert!(p.matches_search(""));
        assert!(!p.matches_search("gizmo"));
    }

    #[test]
    fn test_apply_update_touches_only_present_fields() {
        let mut p = widget(10);
        p.description = Some("old".to_string());
        let update = ProductUpdate {
            price: Some(Money::from_cents(1299)),
            description: Some(None),
            ..Default::default()
        };

        p.apply_update(&update, Utc::now());

        assert_eq!(p.price_cents, 1299);
        assert_eq!(p.description, None);
        assert_eq!(p.name, "Widget");
        assert_eq!(p.stock_quantity, 10);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ProductUpdate::default().is_empty());
        assert!(!ProductUpdate::stock(3).is_empty());
    }

    #[test]
    fn test_sale_total() {
        let sale = Sale {
            id: "s".to_string(),
            product_id: "p".to_string(),
            quantity_sold: 3,
            sale_price_cents: 999,
            sale_date: Utc::now(),
        };
        assert_eq!(sale.total().cents(), 2997);
    }

    #[test]
    fn test_sale_entry_serializes_flat() {
        let entry = SaleEntry {
            sale: Sale {
                id: "s".to_string(),
                product_id: "p".to_string(),
                quantity_sold: 1,
                sale_price_cents: 100,
                sale_date: Utc::now(),
            },
            product_name: None,
            product_sku: Some("W1".to_string()),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["quantity_sold"], 1);
        assert_eq!(json["product_sku"], "W1");
        assert!(json["product_name"].is_null());
    }
}
