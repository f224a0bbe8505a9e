//! Order Model
//!
//! Orders are created `pending` and move through admin-selected states.
//! `cancelled` and `completed` are terminal; the only transition rule the
//! manager enforces everywhere is that nothing leaves `cancelled`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Order Status
// =============================================================================

/// Order status enum
///
/// The upstream data contained mixed-case literals (`Pending` vs `pending`),
/// so parsing is case-insensitive and serialization always emits the
/// lowercase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Completed,
    /// Customer asked for cancellation; awaits admin confirmation
    CancelRequested,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further stock-affecting transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::CancelRequested => "cancel_requested",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Normalize: lowercase, separators stripped ("CancelRequested",
        // "cancel_requested" and "cancel-requested" all parse)
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "completed" => Ok(OrderStatus::Completed),
            "cancelrequested" => Ok(OrderStatus::CancelRequested),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("unknown order status: {}", s)),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

// =============================================================================
// Order (主表)
// =============================================================================

/// Order row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning user id
    pub user: String,
    pub status: OrderStatus,
    pub total_price: f64,
    /// Human-readable code, time-based and never reused
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
}

// =============================================================================
// Order Item
// =============================================================================

/// Order line item. Created atomically with the order; immutable afterwards
/// except for deletion during a hard purge. The rows record exactly how much
/// stock was reserved, so cancellation can restore it exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Record key of the owning order. Named `order_id` so raw queries never
    /// collide with the ORDER keyword.
    pub order_id: String,
    /// Record key of the product
    pub product: String,
    pub size: i32,
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!(
            "CANCELLED".parse::<OrderStatus>(),
            Ok(OrderStatus::Cancelled)
        );
        assert_eq!(
            "CancelRequested".parse::<OrderStatus>(),
            Ok(OrderStatus::CancelRequested)
        );
        assert_eq!(
            "cancel_requested".parse::<OrderStatus>(),
            Ok(OrderStatus::CancelRequested)
        );
        assert!("unknown".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::CancelRequested).unwrap();
        assert_eq!(json, "\"cancel_requested\"");

        let parsed: OrderStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(parsed, OrderStatus::Completed);
    }
}
