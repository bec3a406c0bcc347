//! 服务模块
//!
//! - [`push`] - 外部推送 provider 边界
//! - [`notification`] - 令牌注册表 + multicast 分发

pub mod notification;
pub mod push;

pub use notification::{DispatchOutcome, NotificationService};
pub use push::{HttpPushProvider, PushProvider};
