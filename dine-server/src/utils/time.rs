//! 时间工具函数 — 报表时间窗口计算
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// 日期开始 (00:00:00 UTC) → Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
        .timestamp_millis()
}

/// 日期结束 → 次日 00:00:00 的 Unix millis
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day)
}

/// 今日窗口 [start, end)
pub fn today_window() -> (i64, i64) {
    let today = Utc::now().date_naive();
    (day_start_millis(today), day_end_millis(today))
}

/// 当月窗口 [start, end)
pub fn month_window() -> (i64, i64) {
    let now = Utc::now().date_naive();
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap();
    let next_month = if now.month() == 12 {
        NaiveDate::from_ymd_opt(now.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(now.year(), now.month() + 1, 1).unwrap()
    };
    (day_start_millis(first), day_start_millis(next_month))
}

/// 回溯窗口起点：now - hours
pub fn hours_ago_millis(hours: i64) -> i64 {
    (Utc::now() - Duration::hours(hours)).timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_are_exclusive_end() {
        let date = parse_date("2025-03-10").unwrap();
        let start = day_start_millis(date);
        let end = day_end_millis(date);
        assert_eq!(end - start, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn month_window_covers_now() {
        let (start, end) = month_window();
        let now = shared::util::now_millis();
        assert!(start <= now && now < end);
    }

    #[test]
    fn bad_date_is_validation_error() {
        assert!(parse_date("10/03/2025").is_err());
    }
}
