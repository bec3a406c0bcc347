//! Analytics API Handlers
//!
//! 营收只统计 `payment_status == Paid` 的订单，按
//! `total_amount - discount` 求和。纯读侧，无副作用。

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::OrderRepository;
use crate::utils::time::{day_end_millis, day_start_millis, month_window, parse_date, today_window};
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Serialize)]
pub struct RevenueResponse {
    pub total: f64,
}

/// GET /api/analytics/revenue/today (admin)
pub async fn revenue_today(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<RevenueResponse>>> {
    let (start, end) = today_window();
    revenue_window(&state, start, end).await
}

/// GET /api/analytics/revenue/month (admin)
pub async fn revenue_month(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<RevenueResponse>>> {
    let (start, end) = month_window();
    revenue_window(&state, start, end).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/analytics/revenue/range?startDate=..&endDate=.. (admin)
pub async fn revenue_range(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<AppResponse<RevenueResponse>>> {
    let (Some(start_date), Some(end_date)) = (query.start_date, query.end_date) else {
        return Err(AppError::validation("startDate and endDate are required"));
    };

    let start = day_start_millis(parse_date(&start_date)?);
    let end = day_end_millis(parse_date(&end_date)?);
    if end <= start {
        return Err(AppError::validation("endDate must not precede startDate"));
    }

    revenue_window(&state, start, end).await
}

async fn revenue_window(
    state: &ServerState,
    start: i64,
    end: i64,
) -> AppResult<Json<AppResponse<RevenueResponse>>> {
    let repo = OrderRepository::new(state.get_db());
    let total = repo.revenue_between(start, end).await?;
    Ok(ok(RevenueResponse { total }))
}
