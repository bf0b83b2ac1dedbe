//! 时间工具函数
//!
//! 日期解析统一在 API handler / manager 层完成，
//! repository 层只接收已验证的 `NaiveDate`。

use chrono::NaiveDate;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_date("06/01/2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }
}
