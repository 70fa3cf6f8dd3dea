//! Time utilities: parsing HH:MM, signed durations and the serde
//! adapter for wire times.

use chrono::NaiveTime;

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}

/// Parse an `HH:MM` duration (optionally signed) into minutes.
pub fn duration_to_minutes(s: &str) -> Option<i64> {
    let s = s.trim();
    let (neg, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (h, m) = body.split_once(':')?;
    let total = h.parse::<i64>().ok()? * 60 + m.parse::<i64>().ok()?;
    Some(if neg { -total } else { total })
}

/// Serde adapter for booking times: reads `HH:MM` or `HH:MM:SS`,
/// writes `HH:MM:SS`.
pub mod serde_hm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid time: {raw}")))
    }
}
