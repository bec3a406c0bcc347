//! Order domain types shared between server and clients
//!
//! The status set is closed and matches the kitchen workflow exactly.
//! Wire names keep the human-readable spellings the dashboards display
//! ("Processing in Kitchen", not PROCESSING_IN_KITCHEN).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status (closed set)
///
/// Intended forward progression:
/// Approved → Processing in Kitchen → Ready to Serve → Served.
///
/// Transitions are NOT enforced forward-only: staff may move an order
/// back to correct a mistake. Anything outside this set fails
/// deserialization before it reaches the order service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Approved,
    #[serde(rename = "Processing in Kitchen")]
    ProcessingInKitchen,
    #[serde(rename = "Ready to Serve")]
    ReadyToServe,
    Served,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "Approved"),
            Self::ProcessingInKitchen => write!(f, "Processing in Kitchen"),
            Self::ReadyToServe => write!(f, "Ready to Serve"),
            Self::Served => write!(f, "Served"),
        }
    }
}

/// How the customer intends to pay
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Online,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Online => write!(f, "Online"),
        }
    }
}

/// Payment flag, orthogonal to [`OrderStatus`]
///
/// An order can be Served and Unpaid at the same time (pay-after-dining).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unpaid => write!(f, "Unpaid"),
            Self::Paid => write!(f, "Paid"),
        }
    }
}

// ============================================================================
// Resolved views (for staff dashboards and event payloads)
// ============================================================================

/// Order owner, expanded for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_guest: bool,
}

/// A single order line with the menu item expanded
///
/// `price` is the frozen per-unit price captured at order placement,
/// not the live catalog price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub menu_item_id: String,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

/// Fully resolved order (owner + line items expanded)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub table_number: u32,
    pub owner: OwnerView,
    pub items: Vec<OrderLineView>,
    pub total_amount: f64,
    pub address: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub transaction_id: String,
    pub discount: f64,
    pub estimated_time: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl OrderView {
    /// Amount actually due: `total_amount - discount`, floored at zero
    pub fn payable(&self) -> f64 {
        (self.total_amount - self.discount).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_keep_spaces() {
        let json = serde_json::to_string(&OrderStatus::ProcessingInKitchen).unwrap();
        assert_eq!(json, "\"Processing in Kitchen\"");

        let parsed: OrderStatus = serde_json::from_str("\"Ready to Serve\"").unwrap();
        assert_eq!(parsed, OrderStatus::ReadyToServe);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<OrderStatus, _> = serde_json::from_str("\"Cancelled\"");
        assert!(result.is_err());
    }
}
