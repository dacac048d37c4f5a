use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

// 不带时区的输入格式，按配置的时区解释
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// 宽松解析截止时间 / 开始时间 / 结束时间
///
/// 支持 RFC 3339 与 datetime-local 格式；只有日期时取当天结束时刻。
/// 空值或无法解析的输入视为未设置。
pub fn parse_due_date(value: Option<&str>, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(23, 59, 59))
        });

    match naive.and_then(|n| offset.from_local_datetime(&n).single()) {
        Some(local) => Some(local.with_timezone(&Utc)),
        None => {
            warn!("无法解析的日期时间，按未设置处理: {}", raw);
            None
        }
    }
}

/// 解析 `+08:00` 形式的时区偏移
pub fn parse_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("utc") || value == "Z" {
        return FixedOffset::east_opt(0);
    }
    value.parse::<FixedOffset>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc8() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_rfc3339_keeps_its_offset() {
        let parsed = parse_due_date(Some("2025-03-01T10:00:00+02:00"), utc8()).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-03-01T08:00:00+00:00");
    }

    #[test]
    fn test_naive_uses_configured_offset() {
        let parsed = parse_due_date(Some("2025-03-01T10:00"), utc8()).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-03-01T02:00:00+00:00");

        let spaced = parse_due_date(Some("2025-03-01 10:00:30"), utc8()).unwrap();
        assert_eq!(spaced.to_rfc3339(), "2025-03-01T02:00:30+00:00");
    }

    #[test]
    fn test_date_only_is_end_of_day() {
        let parsed = parse_due_date(Some("2025-03-01"), utc8()).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-03-01T15:59:59+00:00");
    }

    #[test]
    fn test_empty_and_garbage_are_absent() {
        assert_eq!(parse_due_date(None, utc8()), None);
        assert_eq!(parse_due_date(Some("   "), utc8()), None);
        assert_eq!(parse_due_date(Some("next friday"), utc8()), None);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("+08:00"), Some(utc8()));
        assert_eq!(parse_offset("UTC"), FixedOffset::east_opt(0));
        assert_eq!(parse_offset("Asia/Shanghai"), None);
    }
}
