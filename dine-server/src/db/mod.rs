//! Database Module
//!
//! 嵌入式 SurrealDB 存储。生产环境使用 RocksDB 引擎，测试使用内存引擎。

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "dine";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::initialize(db).await
    }

    /// In-memory database (tests, ephemeral runs)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::initialize(db).await
    }

    async fn initialize(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database connection established (SurrealDB embedded)");
        Ok(Self { db })
    }
}

/// 定义唯一索引
///
/// SurrealDB 默认 schemaless；这里只声明不变量需要的唯一约束：
/// - user.email 全局唯一（guest 合成邮箱也在同一唯一域）
/// - notification_token.token 全局唯一（upsert-by-token 的前提）
/// - cart.user 唯一（每个用户一个购物车）
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS notification_token_value ON TABLE notification_token COLUMNS token UNIQUE;
        DEFINE INDEX IF NOT EXISTS cart_owner ON TABLE cart COLUMNS user UNIQUE;
        DEFINE INDEX IF NOT EXISTS order_table ON TABLE order COLUMNS table_number;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn on_disk_database_initializes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dine.db");
        let service = DbService::new(&path.to_string_lossy()).await.unwrap();
        service.db.query("INFO FOR DB").await.unwrap();
    }

    #[tokio::test]
    async fn schema_definition_is_idempotent() {
        let service = DbService::memory().await.unwrap();
        define_schema(&service.db).await.unwrap();
    }
}
