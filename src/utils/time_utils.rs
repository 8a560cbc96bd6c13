use chrono::{DateTime, Duration, Utc};

/// "在线"实体的判定窗口（分钟）：最近 5 分钟内出现过
pub const ACTIVE_ENTITY_WINDOW_MINUTES: i64 = 5;

/// 仪表盘"近期事件"的统计窗口（分钟）
pub const RECENT_EVENT_WINDOW_MINUTES: i64 = 60;

/// 位置历史的默认回溯时长（分钟）
pub const DEFAULT_HISTORY_MINUTES: i64 = 30;

/// 当前 UTC 时间
#[inline]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// 返回 `now - minutes` 的时间点
///
/// 超出可表示范围时退回到 Unix 纪元，不会早于 1970-01-01
pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    let earliest = DateTime::<Utc>::default();
    Duration::try_minutes(minutes)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .map_or(earliest, |since| since.max(earliest))
}

/// RFC3339 格式（毫秒精度，`Z` 结尾）
#[inline]
pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
