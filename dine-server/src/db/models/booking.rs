//! Table Booking Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use std::fmt;

/// Booking status (closed set)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BookingStatus {
    #[default]
    Pending,
    Approved,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Approved => write!(f, "Approved"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Table booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub name: String,
    pub phone: String,
    pub number_of_people: u32,
    /// Reservation date (YYYY-MM-DD)
    pub date: String,
    /// Reservation time slot (HH:MM)
    pub time: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub status: BookingStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Deserialize, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreate {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 5, max = 20))]
    pub phone: String,
    #[validate(range(min = 1, max = 500))]
    pub number_of_people: u32,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub note: String,
}

/// Booking status change payload
#[derive(Debug, Clone, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}
