//! Cart Repository
//!
//! 每个用户一个购物车（cart.user 唯一索引）。写入走 UPSERT，
//! 下单成功后由订单服务调用 [`CartRepository::clear`] 原子清空。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartLine};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the cart for a user ("user:xxx")
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Option<Cart>> {
        let user_owned = user_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user LIMIT 1")
            .bind(("user", user_owned))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Replace the user's cart lines (creates the cart on first write)
    pub async fn save_items(&self, user_id: &str, items: Vec<CartLine>) -> RepoResult<Cart> {
        let user_owned = user_id.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT cart SET user = $user, items = $items, updated_at = $now \
                 WHERE user = $user RETURN AFTER",
            )
            .bind(("user", user_owned))
            .bind(("items", items))
            .bind(("now", now_millis()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        carts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to save cart".to_string()))
    }

    /// Empty the user's cart in a single atomic update
    pub async fn clear(&self, user_id: &str) -> RepoResult<()> {
        let user_owned = user_id.to_string();
        self.base
            .db()
            .query("UPDATE cart SET items = [], updated_at = $now WHERE user = $user")
            .bind(("user", user_owned))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use surrealdb::RecordId;

    fn line(key: &str, quantity: u32) -> CartLine {
        CartLine {
            menu_item: RecordId::from_table_key("menu_item", key),
            quantity,
        }
    }

    #[tokio::test]
    async fn save_is_upsert_per_user() {
        let db = DbService::memory().await.unwrap();
        let repo = CartRepository::new(db.db.clone());

        repo.save_items("user:a", vec![line("pizza", 1)]).await.unwrap();
        repo.save_items("user:a", vec![line("pizza", 2), line("cola", 1)])
            .await
            .unwrap();

        let cart = repo.find_by_user("user:a").await.unwrap().unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].quantity, 2);

        // Distinct users keep distinct carts
        assert!(repo.find_by_user("user:b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_empties_items() {
        let db = DbService::memory().await.unwrap();
        let repo = CartRepository::new(db.db.clone());

        repo.save_items("user:a", vec![line("pizza", 1)]).await.unwrap();
        repo.clear("user:a").await.unwrap();

        let cart = repo.find_by_user("user:a").await.unwrap().unwrap();
        assert!(cart.items.is_empty());
    }
}
