//! Feedback Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Customer feedback entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default, with = "serde_helpers::option_record_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: i64,
}

/// Create feedback payload
#[derive(Debug, Clone, Deserialize, validator::Validate)]
pub struct FeedbackCreate {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}
