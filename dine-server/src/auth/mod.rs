//! 认证模块
//!
//! - [`JwtService`] - JWT 令牌生成与验证
//! - [`CurrentUser`] - 请求主体上下文
//! - 中间件: [`require_auth`]、[`require_admin`]、[`require_super_admin`]

pub mod jwt;
pub mod middleware;

pub use jwt::{AdminLevel, Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};
pub use middleware::{CurrentUserExt, require_admin, require_auth, require_super_admin};
