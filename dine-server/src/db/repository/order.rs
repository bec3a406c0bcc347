//! Order Repository
//!
//! 订单的持久化访问。单字段变更（status / payment_status / discount /
//! estimated_time）都是一次原子 merge，不做读-改-写两趟往返；
//! 并发写同一订单时 last-write-wins。

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Order;
use serde::Serialize;
use shared::order::{OrderStatus, PaymentStatus};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_record_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// All orders, newest first (staff dashboards)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders owned by a user, newest first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let user_owned = user_id.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user_owned))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders for a table created at or after `since` (millis), newest first
    ///
    /// Used for unauthenticated/guest table lookups.
    pub async fn find_by_table_since(
        &self,
        table_number: u32,
        since: i64,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE table_number = $table AND created_at >= $since \
                 ORDER BY created_at DESC",
            )
            .bind(("table", table_number))
            .bind(("since", since))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All orders for a table regardless of age (claim candidates)
    pub async fn find_by_table(&self, table_number: u32) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE table_number = $table ORDER BY created_at DESC")
            .bind(("table", table_number))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Atomic status overwrite
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        #[derive(Serialize)]
        struct Patch {
            status: OrderStatus,
            updated_at: i64,
        }
        self.merge(id, Patch { status, updated_at: now_millis() }).await
    }

    /// Atomic payment status overwrite
    pub async fn set_payment_status(
        &self,
        id: &str,
        payment_status: PaymentStatus,
    ) -> RepoResult<Order> {
        #[derive(Serialize)]
        struct Patch {
            payment_status: PaymentStatus,
            updated_at: i64,
        }
        self.merge(id, Patch { payment_status, updated_at: now_millis() }).await
    }

    /// Atomic discount overwrite (scalar, not a delta)
    pub async fn set_discount(&self, id: &str, discount: f64) -> RepoResult<Order> {
        #[derive(Serialize)]
        struct Patch {
            discount: f64,
            updated_at: i64,
        }
        self.merge(id, Patch { discount, updated_at: now_millis() }).await
    }

    /// Atomic estimated-time overwrite (minutes)
    pub async fn set_estimated_time(&self, id: &str, estimated_time: u32) -> RepoResult<Order> {
        #[derive(Serialize)]
        struct Patch {
            estimated_time: u32,
            updated_at: i64,
        }
        self.merge(id, Patch { estimated_time, updated_at: now_millis() }).await
    }

    /// Reassign ownership (guest→registered claiming)
    pub async fn reassign_owner(&self, id: &str, new_user_id: &str) -> RepoResult<Order> {
        #[derive(Serialize)]
        struct Patch {
            user: String,
            updated_at: i64,
        }
        self.merge(
            id,
            Patch {
                user: new_user_id.to_string(),
                updated_at: now_millis(),
            },
        )
        .await
    }

    async fn merge<P: Serialize + 'static>(&self, id: &str, patch: P) -> RepoResult<Order> {
        let record_id = parse_record_id(TABLE, id)?;
        let updated: Option<Order> = self.base.db().update(record_id).merge(patch).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
    }

    /// Paid revenue in [start, end): Σ (total_amount - discount)
    ///
    /// Empty result set yields 0, not an error.
    pub async fn revenue_between(&self, start: i64, end: i64) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT math::sum(total_amount - (discount ?? 0)) AS total FROM order \
                 WHERE payment_status = 'Paid' \
                 AND created_at >= $start AND created_at < $end \
                 GROUP ALL",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let total: Option<f64> = result.take((0, "total"))?;
        Ok(total.unwrap_or(0.0))
    }
}
