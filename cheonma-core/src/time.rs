//! Time utilities: the injected local clock and hour-of-day buckets.

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Current wall-clock time in an IANA tz like "Asia/Seoul".
pub fn local_now(tz: &str) -> Result<NaiveDateTime> {
    to_local(Utc::now(), tz)
}

/// Convert a UTC instant to naive local time in `tz`.
pub fn to_local(instant: DateTime<Utc>, tz: &str) -> Result<NaiveDateTime> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(instant.with_timezone(&tz).naive_local())
}

/// Parse a local timestamp like "2026-02-20 23:59" (seconds optional, `T` accepted).
pub fn parse_local_datetime(local: &str) -> Result<NaiveDateTime> {
    let local = local.trim();
    ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())
        .ok_or_else(|| anyhow::anyhow!("invalid local datetime '{local}' (expected YYYY-MM-DD HH:MM)"))
}

/// Hour-of-day buckets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Daypart {
    /// 06-10
    #[serde(rename = "early-morning")]
    EarlyMorning,
    /// 11-14
    #[serde(rename = "midday")]
    Midday,
    /// 15-18
    #[serde(rename = "afternoon")]
    Afternoon,
    /// 19-23
    #[serde(rename = "evening")]
    Evening,
    /// Everything else
    #[serde(rename = "late-night")]
    LateNight,
}

impl Daypart {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=10 => Daypart::EarlyMorning,
            11..=14 => Daypart::Midday,
            15..=18 => Daypart::Afternoon,
            19..=23 => Daypart::Evening,
            _ => Daypart::LateNight,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Daypart::EarlyMorning => "early morning",
            Daypart::Midday => "midday",
            Daypart::Afternoon => "afternoon",
            Daypart::Evening => "evening",
            Daypart::LateNight => "late night",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_seoul_local_time() {
        // KST is UTC+9, no DST
        let utc = Utc.with_ymd_and_hms(2026, 2, 20, 23, 30, 0).unwrap();
        let local = to_local(utc, "Asia/Seoul").unwrap();
        assert_eq!(local.to_string(), "2026-02-21 08:30:00");
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(local_now("Mars/Olympus").is_err());
    }

    #[test]
    fn test_parse_local_datetime() {
        let a = parse_local_datetime("2026-02-20 23:59").unwrap();
        let b = parse_local_datetime("2026-02-20T23:59:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hour(), 23);
        assert!(parse_local_datetime("yesterday").is_err());
    }

    #[test]
    fn test_daypart_boundaries() {
        assert_eq!(Daypart::from_hour(5), Daypart::LateNight);
        assert_eq!(Daypart::from_hour(6), Daypart::EarlyMorning);
        assert_eq!(Daypart::from_hour(10), Daypart::EarlyMorning);
        assert_eq!(Daypart::from_hour(11), Daypart::Midday);
        assert_eq!(Daypart::from_hour(15), Daypart::Afternoon);
        assert_eq!(Daypart::from_hour(19), Daypart::Evening);
        assert_eq!(Daypart::from_hour(23), Daypart::Evening);
        assert_eq!(Daypart::from_hour(0), Daypart::LateNight);
    }
}
