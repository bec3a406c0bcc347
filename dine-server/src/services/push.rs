//! Push-delivery provider boundary
//!
//! 这是核心里唯一跨真实外部投递边界的调用。provider 被视为不可靠：
//! multicast 部分失败是常态而非异常，必须按 token 逐个归类结果。
//!
//! [`HttpPushProvider`] 通过 HTTP 调用 FCM 风格的 multicast 接口；
//! 未配置时服务持有 `None`，调用方得到非致命的 NotConfigured 结果。

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use crate::utils::{AppError, AppResult};

/// One multicast call: full token list + notification + string metadata
///
/// 传输层只支持字符串元数据，data 值在进入这里之前已全部转成字符串。
#[derive(Debug, Clone)]
pub struct MulticastMessage {
    pub tokens: Vec<String>,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

/// Per-token delivery classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    /// Token no longer registered with the provider — will never succeed again
    Unregistered,
    /// Token is malformed — will never succeed again
    InvalidToken,
    /// Rate limiting, temporary unavailability — token must NOT be evicted
    Transient(String),
}

impl DeliveryStatus {
    /// Permanent invalidity drives token eviction; transient failures never do
    pub fn is_permanent_failure(&self) -> bool {
        matches!(self, Self::Unregistered | Self::InvalidToken)
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Delivered)
    }
}

/// Result of one multicast call, aligned with the request's token order
#[derive(Debug, Clone)]
pub struct MulticastResponse {
    pub results: Vec<(String, DeliveryStatus)>,
}

impl MulticastResponse {
    pub fn success_count(&self) -> u32 {
        self.results
            .iter()
            .filter(|(_, s)| !s.is_failure())
            .count() as u32
    }

    pub fn failure_count(&self) -> u32 {
        self.results.iter().filter(|(_, s)| s.is_failure()).count() as u32
    }

    /// Tokens the provider reported as permanently invalid
    pub fn permanently_invalid(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|(_, s)| s.is_permanent_failure())
            .map(|(t, _)| t.clone())
            .collect()
    }
}

/// External push-delivery provider
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// One multicast delivery call for the full token list
    ///
    /// Errors mean the call itself failed (provider unreachable); partial
    /// per-token failure is a successful call with failure entries.
    async fn send_multicast(&self, message: &MulticastMessage) -> AppResult<MulticastResponse>;
}

// ============================================================================
// HTTP provider (FCM-style multicast endpoint)
// ============================================================================

/// FCM 风格的 HTTP multicast provider
pub struct HttpPushProvider {
    client: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl HttpPushProvider {
    pub fn new(endpoint: String, server_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            server_key,
        }
    }
}

/// Provider wire response
#[derive(Debug, Deserialize)]
struct WireResponse {
    results: Vec<WireResult>,
}

#[derive(Debug, Deserialize)]
struct WireResult {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Map a provider error code onto the eviction taxonomy
///
/// 与原生 FCM 错误码对齐：not-registered / invalid-registration 是永久
/// 失效，其余一律按瞬时处理（宁可多发几次，不可误删 token）。
fn classify_error(code: &str) -> DeliveryStatus {
    let lower = code.to_lowercase();
    if lower.contains("registration-token-not-registered") || lower.contains("unregistered") {
        DeliveryStatus::Unregistered
    } else if lower.contains("invalid-registration-token") || lower.contains("invalid-argument") {
        DeliveryStatus::InvalidToken
    } else {
        DeliveryStatus::Transient(code.to_string())
    }
}

#[async_trait]
impl PushProvider for HttpPushProvider {
    async fn send_multicast(&self, message: &MulticastMessage) -> AppResult<MulticastResponse> {
        let payload = serde_json::json!({
            "tokens": message.tokens,
            "notification": {
                "title": message.title,
                "body": message.body,
            },
            "data": message.data,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.server_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::delivery(format!("Push provider unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::delivery(format!(
                "Push provider returned {}",
                response.status()
            )));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| AppError::delivery(format!("Invalid push provider response: {e}")))?;

        if wire.results.len() != message.tokens.len() {
            return Err(AppError::delivery(format!(
                "Push provider returned {} results for {} tokens",
                wire.results.len(),
                message.tokens.len()
            )));
        }

        let results = message
            .tokens
            .iter()
            .zip(wire.results)
            .map(|(token, r)| {
                let status = if r.success {
                    DeliveryStatus::Delivered
                } else {
                    classify_error(r.error.as_deref().unwrap_or("unknown"))
                };
                (token.clone(), status)
            })
            .collect();

        Ok(MulticastResponse { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fcm_error_codes_classify_correctly() {
        assert_eq!(
            classify_error("messaging/registration-token-not-registered"),
            DeliveryStatus::Unregistered
        );
        assert_eq!(
            classify_error("messaging/invalid-registration-token"),
            DeliveryStatus::InvalidToken
        );
        assert!(matches!(
            classify_error("messaging/quota-exceeded"),
            DeliveryStatus::Transient(_)
        ));
    }

    #[test]
    fn only_permanent_failures_drive_eviction() {
        let response = MulticastResponse {
            results: vec![
                ("a".into(), DeliveryStatus::Delivered),
                ("b".into(), DeliveryStatus::Unregistered),
                ("c".into(), DeliveryStatus::Transient("rate limited".into())),
                ("d".into(), DeliveryStatus::InvalidToken),
            ],
        };

        assert_eq!(response.success_count(), 1);
        assert_eq!(response.failure_count(), 3);
        assert_eq!(response.permanently_invalid(), vec!["b", "d"]);
    }
}
