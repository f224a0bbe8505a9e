//! Product Model
//!
//! A product carries a denormalized `max_quantity` that must equal the sum
//! of its per-size rows after every completed inventory operation. The
//! per-size rows are the source of truth; `max_quantity` exists so listing
//! screens never have to join `product_size`.

use serde::{Deserialize, Serialize};

/// Fixed EU shoe size range; every product gets one row per size.
pub const SIZE_RANGE: std::ops::RangeInclusive<i32> = 34..=45;

/// Product row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Record key of the owning category (plain reference, no fetch)
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: String,
    /// Denormalized total stock. Owned by the inventory ledger, or rewritten
    /// wholesale when the size rows are replaced on product update.
    #[serde(default)]
    pub max_quantity: i32,
}

/// Per-size stock row, unique per (product, size)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSize {
    /// Record key of the owning product
    pub product: String,
    pub size: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category: Option<String>,
    pub price: f64,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Initial quantity per size, exactly one entry per size in [`SIZE_RANGE`]
    pub sizes: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// When present, replaces all 12 size rows and recomputes `max_quantity`
    #[serde(default)]
    pub sizes: Option<Vec<i32>>,
}
