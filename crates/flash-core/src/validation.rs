//! # Validation Module
//!
//! Input validation for Flash Inventory.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── Decimal price → Money conversion                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Trimming and normalisation                                        │
//! │  └── Business rule validation                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE(sku)                                                       │
//! │  ├── CHECK(stock_quantity >= 0)                                        │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators that normalise their input return the cleaned value, so the
//! caller stores exactly what was checked.
//!
//! ## Usage
//! ```rust
//! use flash_core::validation::{validate_sku, validate_quantity};
//!
//! assert_eq!(validate_sku("  W1 ").unwrap(), "W1");
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewProduct, ProductUpdate};
use crate::{DEFAULT_CATEGORY, MAX_PRICE_CENTS, MAX_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_SKU_LEN: usize = 50;
const MAX_NAME_LEN: usize = 200;
const MAX_CATEGORY_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 50 characters
///
/// ## Example
/// ```rust
/// use flash_core::validation::validate_sku;
///
/// assert!(validate_sku("COKE-330").is_ok());
/// assert!(validate_sku("   ").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<String> {
    bounded_text(sku, "sku", MAX_SKU_LEN)
}

/// Validates a product name and returns it trimmed.
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    bounded_text(name, "name", MAX_NAME_LEN)
}

/// Normalises a category: blank or absent becomes `"General"`.
pub fn validate_category(category: Option<&str>) -> ValidationResult<String> {
    match category.map(str::trim) {
        None | Some("") => Ok(DEFAULT_CATEGORY.to_string()),
        Some(c) if c.chars().count() > MAX_CATEGORY_LEN => Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: MAX_CATEGORY_LEN,
        }),
        Some(c) => Ok(c.to_string()),
    }
}

/// Normalises a description: blank becomes `None`.
pub fn validate_description(description: Option<&str>) -> ValidationResult<Option<String>> {
    match description.map(str::trim) {
        None | Some("") => Ok(None),
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        }),
        Some(d) => Ok(Some(d.to_string())),
    }
}

/// Validates a search query.
///
/// ## Returns
/// `None` for a blank query (meaning "everything"), otherwise the trimmed term.
pub fn validate_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    if query.is_empty() {
        Ok(None)
    } else {
        Ok(Some(query.to_string()))
    }
}

fn bounded_text(value: &str, field: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Converts a decimal wire price to [`Money`].
///
/// The sign is judged on the raw amount, before rounding to cents, so
/// `-0.004` is negative and `0.004` is a positive amount too small to charge.
pub fn parse_price(amount: f64, field: &str) -> ValidationResult<Money> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if amount < 0.0 {
        return Err(ValidationError::negative(field));
    }

    let money = Money::from_decimal(amount)
        .ok_or_else(|| ValidationError::too_large(field, MAX_PRICE_CENTS))?;

    if amount > 0.0 && money.is_zero() {
        return Err(ValidationError::must_be_positive(field));
    }
    Ok(money)
}

/// Converts an optional caller sale price. Exactly zero means "use the
/// listed price" and maps to `None`.
///
/// ```text
/// amount      result
/// ──────      ──────────────────────
/// 0.0         Ok(None)       (listed)
/// 12.5        Ok(Some(1250))
/// 0.004       Err(must be > 0)
/// -0.004      Err(negative)
/// ```
pub fn parse_sale_price(amount: f64) -> ValidationResult<Option<Money>> {
    if amount == 0.0 {
        return Ok(None);
    }
    parse_price(amount, "sale_price").map(Some)
}

/// Validates a listed price. Must be strictly positive.
///
/// ## Example
/// ```rust
/// use flash_core::money::Money;
/// use flash_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(999)).is_ok());
/// assert!(validate_price(Money::zero()).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::must_be_positive("price"));
    }
    if price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::too_large("price", MAX_PRICE_CENTS));
    }
    Ok(())
}

/// Validates a stock figure (`stock_quantity`, `min_stock_level`, `new_stock`).
pub fn validate_stock(value: i64, field: &str) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::negative(field));
    }
    if value > MAX_QUANTITY {
        return Err(ValidationError::too_large(field, MAX_QUANTITY));
    }
    Ok(())
}

/// Validates a sale quantity.
///
/// ## User Workflow
/// ```text
/// POST /sales { sku: "W1", quantity: 0 }
///      │
///      ▼
/// validate_quantity(0) ← THIS FUNCTION
///      │
///      ├── qty <= 0? → 400 "quantity must be greater than 0"
///      │
///      └── OK → Sale application protocol
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }
    if qty > MAX_QUANTITY {
        return Err(ValidationError::too_large("quantity", MAX_QUANTITY));
    }
    Ok(())
}

/// Validates a report period in days. Zero is allowed (an empty window).
pub fn validate_period_days(days: i64) -> ValidationResult<i64> {
    if days < 0 {
        return Err(ValidationError::negative("days"));
    }
    Ok(days)
}

/// Resolves the unit price a sale is recorded at.
///
/// ```text
/// requested     listed     result
/// ─────────     ──────     ──────────────────
/// None          999        999  (listed)
/// Some(0)       999        999  (listed)
/// Some(1200)    999        1200 (caller's)
/// Some(-5)      999        Err(negative)
/// None          0          Err(must be > 0)
/// ```
pub fn resolve_sale_price(requested: Option<Money>, listed: Money) -> ValidationResult<Money> {
    let price = match requested {
        Some(p) if p.is_negative() => return Err(ValidationError::negative("sale_price")),
        Some(p) if p.is_positive() => p,
        _ => listed,
    };

    if !price.is_positive() {
        return Err(ValidationError::must_be_positive("sale_price"));
    }
    if price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::too_large("sale_price", MAX_PRICE_CENTS));
    }

    Ok(price)
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates and normalises input for a new product.
pub fn validate_new_product(input: NewProduct) -> ValidationResult<NewProduct> {
    let name = validate_product_name(&input.name)?;
    let sku = validate_sku(&input.sku)?;
    validate_price(input.price)?;
    validate_stock(input.stock_quantity, "stock_quantity")?;
    validate_stock(input.min_stock_level, "min_stock_level")?;

    Ok(NewProduct {
        name,
        sku,
        price: input.price,
        stock_quantity: input.stock_quantity,
        min_stock_level: input.min_stock_level,
        category: validate_category(Some(input.category.as_str()))?,
        description: validate_description(input.description.as_deref())?,
    })
}

/// Validates a partial update. Present fields follow the same rules as
/// [`validate_new_product`]; an update carrying nothing is rejected.
pub fn validate_product_update(update: ProductUpdate) -> ValidationResult<ProductUpdate> {
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }

    let name = update.name.as_deref().map(validate_product_name).transpose()?;
    let sku = update.sku.as_deref().map(validate_sku).transpose()?;

    if let Some(price) = update.price {
        validate_price(price)?;
    }
    if let Some(stock) = update.stock_quantity {
        validate_stock(stock, "stock_quantity")?;
    }
    if let Some(min) = update.min_stock_level {
        validate_stock(min, "min_stock_level")?;
    }

    let category = match update.category.as_deref() {
        Some(c) => Some(validate_category(Some(c))?),
        None => None,
    };
    let description = match update.description {
        Some(d) => Some(validate_description(d.as_deref())?),
        None => None,
    };

    Ok(ProductUpdate {
        name,
        sku,
        price: update.price,
        stock_quantity: update.stock_quantity,
        min_stock_level: update.min_stock_level,
        category,
        description,
    })
}

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use flash_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
