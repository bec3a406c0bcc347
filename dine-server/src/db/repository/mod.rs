//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.
//!
//! ID convention: 全栈统一使用 "table:id" 格式。
//! - 解析: `let id: RecordId = "menu_item:abc".parse()?;`
//! - 创建: `RecordId::from_table_key("menu_item", "abc")`
//! - CRUD: `db.select(id)` / `db.update(id)` / `db.delete(id)` 直接使用 RecordId

// Identity
pub mod user;

// Catalog
pub mod category;
pub mod menu;

// Ordering
pub mod cart;
pub mod order;

// Adjacent features
pub mod booking;
pub mod branding;
pub mod feedback;

// Notifications
pub mod notification_token;

// Re-exports
pub use booking::BookingRepository;
pub use branding::BrandingRepository;
pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use feedback::FeedbackRepository;
pub use menu::MenuRepository;
pub use notification_token::NotificationTokenRepository;
pub use order::OrderRepository;
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a "table:id" string, checking the table prefix
pub(crate) fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let record_id: RecordId = if id.contains(':') {
        id.parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid {table} ID format: {id}")))?
    } else {
        RecordId::from_table_key(table, id)
    };
    if record_id.table() != table {
        return Err(RepoError::NotFound(format!(
            "Invalid {table} ID format: {id}"
        )));
    }
    Ok(record_id)
}
