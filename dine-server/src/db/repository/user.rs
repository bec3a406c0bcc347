//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::auth::AdminLevel;
use crate::db::models::User;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id ("user:xxx")
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id = parse_record_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    /// Find user by email (unique)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a registered user
    pub async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
    ) -> RepoResult<User> {
        self.insert(name, email, password_hash, false, false, AdminLevel::None)
            .await
    }

    /// Create a fresh guest identity (one per session, never reused)
    pub async fn create_guest(
        &self,
        name: String,
        email: String,
        password_hash: String,
    ) -> RepoResult<User> {
        self.insert(name, email, password_hash, true, false, AdminLevel::None)
            .await
    }

    async fn insert(
        &self,
        name: String,
        email: String,
        password_hash: String,
        is_guest: bool,
        is_admin: bool,
        admin_level: AdminLevel,
    ) -> RepoResult<User> {
        let email = email.to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{email}' already exists"
            )));
        }

        let now = now_millis();
        let user = User {
            id: None,
            name,
            email,
            password_hash,
            is_guest,
            is_admin,
            admin_level,
            created_at: now,
            updated_at: now,
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn email_is_globally_unique() {
        let db = DbService::memory().await.unwrap();
        let repo = UserRepository::new(db.db.clone());

        repo.create("Ana".into(), "ana@example.com".into(), "hash".into())
            .await
            .unwrap();

        let dup = repo
            .create("Other".into(), "ANA@example.com".into(), "hash2".into())
            .await;
        assert!(matches!(dup, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn guest_records_are_fresh_per_session() {
        let db = DbService::memory().await.unwrap();
        let repo = UserRepository::new(db.db.clone());

        let g1 = repo
            .create_guest("Guest-a".into(), "guest-1-a@guest.local".into(), "h".into())
            .await
            .unwrap();
        let g2 = repo
            .create_guest("Guest-b".into(), "guest-2-b@guest.local".into(), "h".into())
            .await
            .unwrap();

        assert!(g1.is_guest && g2.is_guest);
        assert_ne!(g1.id_string(), g2.id_string());
    }
}
