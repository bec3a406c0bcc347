//! Branding Repository
//!
//! 单例记录：固定 key，读不到时返回默认品牌信息。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Branding, BrandingUpdate};
use serde::Serialize;
use shared::util::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "branding";
const SINGLETON_KEY: &str = "config";

#[derive(Clone)]
pub struct BrandingRepository {
    base: BaseRepository,
}

impl BrandingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn singleton_id() -> RecordId {
        RecordId::from_table_key(TABLE, SINGLETON_KEY)
    }

    /// Current branding (defaults when never configured)
    pub async fn get(&self) -> RepoResult<Branding> {
        let branding: Option<Branding> = self.base.db().select(Self::singleton_id()).await?;
        Ok(branding.unwrap_or_default())
    }

    /// Merge updates into the singleton record, creating it if needed
    pub async fn update(&self, data: BrandingUpdate) -> RepoResult<Branding> {
        #[derive(Serialize)]
        struct Patch {
            #[serde(skip_serializing_if = "Option::is_none")]
            restaurant_name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            logo: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            tagline: Option<String>,
            updated_at: i64,
        }

        let current = self.get().await?;
        let branding = Branding {
            id: None,
            restaurant_name: data.restaurant_name.unwrap_or(current.restaurant_name),
            logo: data.logo.unwrap_or(current.logo),
            tagline: data.tagline.unwrap_or(current.tagline),
            updated_at: now_millis(),
        };

        let updated: Option<Branding> = self
            .base
            .db()
            .upsert(Self::singleton_id())
            .content(branding)
            .await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update branding".to_string()))
    }
}
