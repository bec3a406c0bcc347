//! 订单模块 - 订单聚合与状态机
//!
//! [`OrderService`] 承载规格的全部订单操作：下单（冻结计价 + 清空
//! 购物车）、staff 变更（状态 / 支付 / 折扣 / 预计时间）、桌号查询
//! 与 guest 订单归集。每次变更在持久化成功后发布实时事件。

pub mod service;

#[cfg(test)]
mod tests;

pub use service::OrderService;
