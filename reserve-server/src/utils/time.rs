//! 时间工具函数 — 营业时区转换
//!
//! 所有日期→时间戳转换统一在 handler/domain 层完成，
//! repository 层只接收 `i64` Unix millis 和 `YYYY-MM-DD` 字符串。

use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// 解析营业时区的 `YYYY-MM-DD HH:MM:SS` 字符串 → Unix millis
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，取跳跃后的时刻；
/// 无法解析返回 None。
pub fn parse_venue_datetime(s: &str, tz: Tz) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()?;
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
}

/// 时间戳所属的营业时区日历日 (`YYYY-MM-DD`)
///
/// 日桶边界为营业时区 [00:00:00, 24:00:00)，调用方使用 `< end` (不含) 语义。
pub fn date_bucket(millis: i64, tz: Tz) -> String {
    let dt = Utc
        .timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now);
    dt.with_timezone(&tz).date_naive().format("%Y-%m-%d").to_string()
}

/// 当前营业时区日历日 (`YYYY-MM-DD`)
pub fn today_bucket(tz: Tz) -> String {
    date_bucket(shared::util::now_millis(), tz)
}
