//! Feedback Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Feedback;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "feedback";

#[derive(Clone)]
pub struct FeedbackRepository {
    base: BaseRepository,
}

impl FeedbackRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, feedback: Feedback) -> RepoResult<Feedback> {
        let created: Option<Feedback> = self.base.db().create(TABLE).content(feedback).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create feedback".to_string()))
    }

    /// All feedback, newest first (admin)
    pub async fn find_all(&self) -> RepoResult<Vec<Feedback>> {
        let feedback: Vec<Feedback> = self
            .base
            .db()
            .query("SELECT * FROM feedback ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(feedback)
    }
}
