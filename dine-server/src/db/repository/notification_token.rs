//! Notification Token Repository
//!
//! token 是全局唯一键。同一设备可能在登出/登录后把既有 token 带给
//! 另一个账号，所以重复注册必须转移所有权（upsert），而不是拒绝。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::NotificationToken;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct NotificationTokenRepository {
    base: BaseRepository,
}

impl NotificationTokenRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All tokens registered by a user
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<NotificationToken>> {
        let user_owned = user_id.to_string();
        let tokens: Vec<NotificationToken> = self
            .base
            .db()
            .query("SELECT * FROM notification_token WHERE user = $user")
            .bind(("user", user_owned))
            .await?
            .take(0)?;
        Ok(tokens)
    }

    /// Find a token record by its token value
    pub async fn find_by_token(&self, token: &str) -> RepoResult<Option<NotificationToken>> {
        let token_owned = token.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM notification_token WHERE token = $token LIMIT 1")
            .bind(("token", token_owned))
            .await?;
        let tokens: Vec<NotificationToken> = result.take(0)?;
        Ok(tokens.into_iter().next())
    }

    /// Upsert by token value: owner and last-seen are always refreshed
    pub async fn upsert(
        &self,
        user_id: &str,
        token: &str,
        platform: &str,
    ) -> RepoResult<NotificationToken> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT notification_token SET \
                   user = $user, token = $token, platform = $platform, \
                   last_seen_at = $now, created_at = created_at ?? $now \
                 WHERE token = $token RETURN AFTER",
            )
            .bind(("user", user_id.to_string()))
            .bind(("token", token.to_string()))
            .bind(("platform", platform.to_string()))
            .bind(("now", now))
            .await?;
        let tokens: Vec<NotificationToken> = result.take(0)?;
        tokens
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to register token".to_string()))
    }

    /// Delete a token only if it is owned by `user_id`
    ///
    /// Returns whether a record was removed.
    pub async fn delete_owned(&self, user_id: &str, token: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                "DELETE notification_token WHERE token = $token AND user = $user RETURN BEFORE",
            )
            .bind(("token", token.to_string()))
            .bind(("user", user_id.to_string()))
            .await?;
        let deleted: Vec<NotificationToken> = result.take(0)?;
        Ok(!deleted.is_empty())
    }

    /// Delete token records by token value (provider-driven eviction)
    pub async fn delete_tokens(&self, tokens: &[String]) -> RepoResult<u32> {
        if tokens.is_empty() {
            return Ok(0);
        }
        let mut result = self
            .base
            .db()
            .query("DELETE notification_token WHERE token IN $tokens RETURN BEFORE")
            .bind(("tokens", tokens.to_vec()))
            .await?;
        let deleted: Vec<NotificationToken> = result.take(0)?;
        Ok(deleted.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn upsert_keeps_token_unique_and_reassigns_owner() {
        let db = DbService::memory().await.unwrap();
        let repo = NotificationTokenRepository::new(db.db.clone());

        repo.upsert("user:a", "tok-1", "web").await.unwrap();
        let reassigned = repo.upsert("user:b", "tok-1", "android").await.unwrap();

        assert_eq!(reassigned.user.to_string(), "user:b");
        assert_eq!(reassigned.platform, "android");

        // Exactly one record for the token value
        assert!(repo.find_by_user("user:a").await.unwrap().is_empty());
        let b_tokens = repo.find_by_user("user:b").await.unwrap();
        assert_eq!(b_tokens.len(), 1);
        assert_eq!(b_tokens[0].token, "tok-1");
    }

    #[tokio::test]
    async fn delete_owned_refuses_foreign_tokens() {
        let db = DbService::memory().await.unwrap();
        let repo = NotificationTokenRepository::new(db.db.clone());

        repo.upsert("user:a", "tok-1", "web").await.unwrap();

        // Another identity cannot unregister it
        assert!(!repo.delete_owned("user:b", "tok-1").await.unwrap());
        assert_eq!(repo.find_by_user("user:a").await.unwrap().len(), 1);

        // The owner can
        assert!(repo.delete_owned("user:a", "tok-1").await.unwrap());
        assert!(repo.find_by_user("user:a").await.unwrap().is_empty());
    }
}
