// Timestamp labels and target timezones
use crate::domain::error::{Result, TimeSeriesError};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Unix values above this magnitude are read as milliseconds rather than seconds.
const UNIX_MILLIS_THRESHOLD: f64 = 2e10;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const AWARE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

/// One label on a timestamp axis.
///
/// Labels coming out of JSON are always parsed; labels handed over through a
/// table are kept as given, so `Raw` text is only ever checked when the series
/// is converted back into a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    Aware(DateTime<FixedOffset>),
    /// Wall-clock time without an offset, read as UTC on conversion
    Naive(NaiveDateTime),
    Raw(String),
}

impl Timestamp {
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    /// Parse an ISO-8601 / RFC 3339 string, with or without offset.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Self::Aware(dt));
        }
        // `%z` does not accept a `Z` designator, so spell it out as an offset
        let zulu = text
            .strip_suffix('Z')
            .or_else(|| text.strip_suffix('z'))
            .map(|rest| format!("{rest}+00:00"));
        let candidate = zulu.as_deref().unwrap_or(text);
        for format in AWARE_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(candidate, format) {
                return Ok(Self::Aware(dt));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Ok(Self::Naive(dt));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Ok(Self::Naive(date.and_time(chrono::NaiveTime::MIN)));
        }

        Err(TimeSeriesError::conversion(
            text,
            "not an ISO-8601 date or datetime",
        ))
    }

    /// Interpret a unix timestamp in seconds (or milliseconds for large values).
    pub fn from_unix(value: f64) -> Result<Self> {
        let millis = if value.abs() > UNIX_MILLIS_THRESHOLD {
            value
        } else {
            value * 1000.0
        };
        if !millis.is_finite() {
            return Err(TimeSeriesError::conversion(value.to_string(), "not a finite number"));
        }
        DateTime::from_timestamp_millis(millis.round() as i64)
            .map(|dt| Self::Aware(dt.fixed_offset()))
            .ok_or_else(|| TimeSeriesError::conversion(value.to_string(), "out of range"))
    }

    /// Normalize to a UTC instant. Naive labels are taken to already be UTC.
    pub fn to_utc(&self) -> Result<DateTime<Utc>> {
        match self {
            Self::Aware(dt) => Ok(dt.with_timezone(&Utc)),
            Self::Naive(dt) => Ok(dt.and_utc()),
            Self::Raw(text) => match Self::parse(text)? {
                Self::Raw(_) => Err(TimeSeriesError::conversion(text.as_str(), "unparsed")),
                parsed => parsed.to_utc(),
            },
        }
    }

    /// Wire representation: RFC 3339 with `Z` for UTC, no offset for naive labels.
    pub fn to_iso_string(&self) -> String {
        match self {
            Self::Aware(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Self::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Self::Raw(text) => text.clone(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Aware(dt.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Aware(dt)
    }
}

impl From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Aware(dt.fixed_offset())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Naive(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

struct TimestampVisitor;

impl Visitor<'_> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an ISO-8601 datetime string or a unix timestamp")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Timestamp, E> {
        Timestamp::parse(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Timestamp, E> {
        Timestamp::from_unix(v as f64).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Timestamp, E> {
        Timestamp::from_unix(v as f64).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Timestamp, E> {
        Timestamp::from_unix(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

/// Target timezone for table conversion.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Zone {
    #[default]
    Utc,
    Fixed(FixedOffset),
    /// IANA database name, e.g. `Europe/Brussels`
    Named(Tz),
}

impl Zone {
    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Utc => instant.fixed_offset(),
            Self::Fixed(offset) => instant.with_timezone(offset),
            Self::Named(tz) => {
                let offset = tz.offset_from_utc_datetime(&instant.naive_utc()).fix();
                instant.with_timezone(&offset)
            }
        }
    }

    fn parse_offset(text: &str) -> Option<FixedOffset> {
        let (sign, rest) = match text.as_bytes().first()? {
            b'+' => (1, &text[1..]),
            b'-' => (-1, &text[1..]),
            _ => return None,
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let (hours, minutes) = match digits.len() {
            2 => (digits.parse::<i32>().ok()?, 0),
            4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
            _ => return None,
        };
        if minutes >= 60 {
            return None;
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
    }
}

impl FromStr for Zone {
    type Err = TimeSeriesError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(Self::Utc);
        }
        if s.starts_with('+') || s.starts_with('-') {
            return Self::parse_offset(s)
                .map(Self::Fixed)
                .ok_or_else(|| TimeSeriesError::UnknownTimezone(s.to_string()));
        }
        s.parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| TimeSeriesError::UnknownTimezone(s.to_string()))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("UTC"),
            Self::Fixed(offset) => write!(f, "{}", offset),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        let ts = Timestamp::parse("2024-01-01T00:00:00Z").unwrap();
        assert!(matches!(ts, Timestamp::Aware(_)));

        let ts = Timestamp::parse("2024-01-01 06:15:00+02:00").unwrap();
        assert_eq!(ts.to_iso_string(), "2024-01-01T06:15:00+02:00");

        let ts = Timestamp::parse("2024-01-01T00:00Z").unwrap();
        assert_eq!(ts.to_iso_string(), "2024-01-01T00:00:00Z");

        let ts = Timestamp::parse("2024-01-01 00:00:00.5Z").unwrap();
        assert_eq!(ts.to_iso_string(), "2024-01-01T00:00:00.500Z");

        let ts = Timestamp::parse("2024-01-01T12:30:00").unwrap();
        assert!(matches!(ts, Timestamp::Naive(_)));

        let ts = Timestamp::parse("2024-03-05").unwrap();
        assert_eq!(ts.to_iso_string(), "2024-03-05T00:00:00");

        assert!(matches!(
            Timestamp::parse("last tuesday"),
            Err(TimeSeriesError::Conversion { .. })
        ));
    }

    #[test]
    fn test_to_utc() {
        let aware = Timestamp::parse("2024-01-01T01:00:00+01:00").unwrap();
        let naive = Timestamp::parse("2024-01-01T00:00:00").unwrap();
        let raw = Timestamp::raw("2024-01-01T00:00:00Z");

        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(aware.to_utc().unwrap(), expected);
        assert_eq!(naive.to_utc().unwrap(), expected);
        assert_eq!(raw.to_utc().unwrap(), expected);

        assert!(matches!(
            Timestamp::raw("not a date").to_utc(),
            Err(TimeSeriesError::Conversion { .. })
        ));
    }

    #[test]
    fn test_utc_serializes_with_z() {
        let ts = Timestamp::from(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-06-01T12:00:00Z\"");
    }

    #[test]
    fn test_deserialize_unix_and_rejects_garbage() {
        let ts: Timestamp = serde_json::from_str("1704067200").unwrap();
        assert_eq!(ts.to_iso_string(), "2024-01-01T00:00:00Z");

        let ts: Timestamp = serde_json::from_str("1704067200000").unwrap();
        assert_eq!(ts.to_iso_string(), "2024-01-01T00:00:00Z");

        assert!(serde_json::from_str::<Timestamp>("\"soon\"").is_err());
        assert!(serde_json::from_str::<Timestamp>("true").is_err());
    }

    #[test]
    fn test_zone_parsing() {
        assert_eq!("UTC".parse::<Zone>().unwrap(), Zone::Utc);
        assert_eq!(
            "+01:00".parse::<Zone>().unwrap(),
            Zone::Fixed(FixedOffset::east_opt(3600).unwrap())
        );
        assert_eq!(
            "-0530".parse::<Zone>().unwrap(),
            Zone::Fixed(FixedOffset::west_opt(5 * 3600 + 1800).unwrap())
        );
        assert_eq!(
            "Europe/Brussels".parse::<Zone>().unwrap(),
            Zone::Named(chrono_tz::Europe::Brussels)
        );
        assert!(matches!(
            "Mars/Olympus_Mons".parse::<Zone>(),
            Err(TimeSeriesError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn test_localize_follows_dst() {
        let zone: Zone = "Europe/Brussels".parse().unwrap();
        let winter = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();

        assert_eq!(zone.localize(winter).to_rfc3339(), "2024-01-01T01:00:00+01:00");
        assert_eq!(zone.localize(summer).to_rfc3339(), "2024-07-01T02:00:00+02:00");
    }
}
