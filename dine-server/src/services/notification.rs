//! Notification dispatch service
//!
//! 把用户身份映射到已注册的设备令牌并执行 multicast 投递：
//!
//! 1. 查该用户的全部 NotificationToken；没有 → NoTokens（常态，非错误）
//! 2. data 值全部转成字符串（传输层只支持字符串元数据）
//! 3. 一次 multicast 调用，检查逐 token 结果
//! 4. 永久失效的 token 删除记录；瞬时失败保留
//!
//! 对触发它的状态变更永远非致命：订单服务在旁路里调用并只记日志。

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::NotificationToken;
use crate::db::repository::NotificationTokenRepository;
use crate::services::push::{MulticastMessage, PushProvider};
use crate::utils::AppResult;

/// Outcome of one dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// No provider configured — expected in development, logged for operators
    NotConfigured,
    /// The user never registered a device — common, not an error
    NoTokens,
    /// Multicast performed
    #[serde(rename_all = "camelCase")]
    Sent {
        success_count: u32,
        failure_count: u32,
        evicted_count: u32,
    },
}

/// Maps identities to device tokens and performs multicast dispatch
#[derive(Clone)]
pub struct NotificationService {
    tokens: NotificationTokenRepository,
    provider: Option<Arc<dyn PushProvider>>,
}

impl NotificationService {
    pub fn new(db: Surreal<Db>, provider: Option<Arc<dyn PushProvider>>) -> Self {
        Self {
            tokens: NotificationTokenRepository::new(db),
            provider,
        }
    }

    /// Push an out-of-band alert to every device registered by `user_id`
    ///
    /// `data` values are coerced to strings. Errors mean the provider call
    /// itself failed; callers on the mutation path must isolate them.
    pub async fn send_to_user(
        &self,
        user_id: &str,
        title: &str,
        body: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> AppResult<DispatchOutcome> {
        let Some(provider) = &self.provider else {
            tracing::warn!(user = %user_id, "Push provider not configured, skipping dispatch");
            return Ok(DispatchOutcome::NotConfigured);
        };

        let records = self.tokens.find_by_user(user_id).await?;
        let token_values: Vec<String> = records
            .iter()
            .map(|t| t.token.clone())
            .filter(|t| !t.is_empty())
            .collect();

        if token_values.is_empty() {
            tracing::debug!(user = %user_id, "No device tokens registered");
            return Ok(DispatchOutcome::NoTokens);
        }

        let message = MulticastMessage {
            tokens: token_values,
            title: title.to_string(),
            body: body.to_string(),
            data: coerce_data(data),
        };

        let response = provider.send_multicast(&message).await?;

        // Evict tokens the provider says will never work again
        let invalid = response.permanently_invalid();
        let evicted_count = if invalid.is_empty() {
            0
        } else {
            tracing::info!(user = %user_id, count = invalid.len(), "Evicting invalid tokens");
            self.tokens.delete_tokens(&invalid).await?
        };

        let outcome = DispatchOutcome::Sent {
            success_count: response.success_count(),
            failure_count: response.failure_count(),
            evicted_count,
        };
        tracing::info!(user = %user_id, ?outcome, "Push dispatch complete");
        Ok(outcome)
    }

    /// Upsert a device token for `user_id` (ownership follows the latest registrant)
    pub async fn register_token(
        &self,
        user_id: &str,
        token: &str,
        platform: &str,
    ) -> AppResult<NotificationToken> {
        Ok(self.tokens.upsert(user_id, token, platform).await?)
    }

    /// Remove a token, but only if `user_id` owns it
    pub async fn unregister_token(&self, user_id: &str, token: &str) -> AppResult<bool> {
        Ok(self.tokens.delete_owned(user_id, token).await?)
    }
}

/// Flatten arbitrary JSON values into the string-only metadata the
/// transport supports
fn coerce_data(data: &HashMap<String, serde_json::Value>) -> HashMap<String, String> {
    data.iter()
        .map(|(k, v)| {
            let s = match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), s)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::services::push::{DeliveryStatus, MulticastResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted provider: answers each token with a preset status
    struct ScriptedProvider {
        script: HashMap<String, DeliveryStatus>,
        calls: Mutex<Vec<MulticastMessage>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<(&str, DeliveryStatus)>) -> Self {
            Self {
                script: script
                    .into_iter()
                    .map(|(t, s)| (t.to_string(), s))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PushProvider for ScriptedProvider {
        async fn send_multicast(&self, message: &MulticastMessage) -> AppResult<MulticastResponse> {
            self.calls.lock().unwrap().push(message.clone());
            let results = message
                .tokens
                .iter()
                .map(|t| {
                    let status = self
                        .script
                        .get(t)
                        .cloned()
                        .unwrap_or(DeliveryStatus::Delivered);
                    (t.clone(), status)
                })
                .collect();
            Ok(MulticastResponse { results })
        }
    }

    async fn service_with(
        provider: Option<Arc<dyn PushProvider>>,
    ) -> (NotificationService, NotificationTokenRepository) {
        let db = DbService::memory().await.unwrap();
        let repo = NotificationTokenRepository::new(db.db.clone());
        (NotificationService::new(db.db.clone(), provider), repo)
    }

    #[tokio::test]
    async fn no_tokens_is_a_non_fatal_outcome() {
        let provider: Arc<dyn PushProvider> = Arc::new(ScriptedProvider::new(vec![]));
        let (service, _) = service_with(Some(provider)).await;

        let outcome = service
            .send_to_user("user:a", "Hi", "Body", &HashMap::new())
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::NoTokens);
    }

    #[tokio::test]
    async fn unconfigured_provider_reports_not_configured() {
        let (service, repo) = service_with(None).await;
        repo.upsert("user:a", "tok-1", "web").await.unwrap();

        let outcome = service
            .send_to_user("user:a", "Hi", "Body", &HashMap::new())
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::NotConfigured);
    }

    #[tokio::test]
    async fn permanent_failures_evict_tokens_transient_do_not() {
        let provider: Arc<dyn PushProvider> = Arc::new(ScriptedProvider::new(vec![
            ("tok-dead", DeliveryStatus::Unregistered),
            ("tok-slow", DeliveryStatus::Transient("rate limited".into())),
        ]));
        let (service, repo) = service_with(Some(provider)).await;

        repo.upsert("user:a", "tok-ok", "web").await.unwrap();
        repo.upsert("user:a", "tok-dead", "web").await.unwrap();
        repo.upsert("user:a", "tok-slow", "android").await.unwrap();

        let outcome = service
            .send_to_user("user:a", "Order ready", "Come pick it up", &HashMap::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Sent {
                success_count: 1,
                failure_count: 2,
                evicted_count: 1,
            }
        );

        // tok-dead evicted, tok-slow and tok-ok kept
        let remaining: Vec<String> = repo
            .find_by_user("user:a")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.contains(&"tok-ok".to_string()));
        assert!(remaining.contains(&"tok-slow".to_string()));
    }

    #[tokio::test]
    async fn data_values_are_coerced_to_strings() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let (service, repo) =
            service_with(Some(provider.clone() as Arc<dyn PushProvider>)).await;
        repo.upsert("user:a", "tok-1", "web").await.unwrap();

        let mut data = HashMap::new();
        data.insert("orderId".to_string(), serde_json::json!("order:1"));
        data.insert("estimatedTime".to_string(), serde_json::json!(15));

        service
            .send_to_user("user:a", "Update", "Body", &data)
            .await
            .unwrap();

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].data["orderId"], "order:1");
        assert_eq!(calls[0].data["estimatedTime"], "15");
    }
}
