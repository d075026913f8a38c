use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Label shown in the user column for every booking in this view.
pub const YOU: &str = "You";

/// Backend booking id. The API hands out either numbers or strings, and the
/// value is passed back verbatim to the table actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingId::Number(n) => write!(f, "{n}"),
            BookingId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for BookingId {
    fn from(n: i64) -> Self {
        BookingId::Number(n)
    }
}

impl From<&str> for BookingId {
    fn from(s: &str) -> Self {
        BookingId::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStatus {
    Booked,
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Booked => "BOOKED",
            BookingStatus::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "BOOKED" => BookingStatus::Booked,
            other => BookingStatus::Other(other.to_string()),
        }
    }

    /// Status as shown to the user: upcoming for live bookings, the backend
    /// string untouched otherwise.
    pub fn display_label(&self) -> String {
        match self {
            BookingStatus::Booked => "Upcoming".to_string(),
            BookingStatus::Other(s) => s.clone(),
        }
    }
}

impl Serialize for BookingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(BookingStatus::parse(&s))
    }
}

/// Booking record as returned by the booking API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBooking {
    pub id: BookingId,
    pub station_name: String,
    #[serde(default)]
    pub start_time: StartTime,
    pub duration: i64,
    pub status: BookingStatus,
}

/// Row handed to the booking table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayBooking {
    pub id: BookingId,
    pub user: String,
    pub station: String,
    pub slot_time: String,
    pub status: String,
}

/// A booking carried over from the booking flow before the backend list has
/// caught up. Same shape as a display row minus the user column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimisticBooking {
    pub id: BookingId,
    pub station: String,
    pub slot_time: String,
    pub status: String,
}

impl OptimisticBooking {
    pub fn into_display(self) -> DisplayBooking {
        DisplayBooking {
            id: self.id,
            user: YOU.to_string(),
            station: self.station,
            slot_time: self.slot_time,
            status: self.status,
        }
    }
}

/// Slot start as sent by the API. Values without an offset are wall-clock
/// times and are shown as-is; a value nothing can read is kept so the row
/// still renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartTime {
    Zoned(DateTime<Utc>),
    Naive(NaiveDateTime),
    Invalid(String),
}

impl Default for StartTime {
    fn default() -> Self {
        StartTime::Invalid(String::new())
    }
}

const ZONED_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl StartTime {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return StartTime::Zoned(dt.with_timezone(&Utc));
        }

        // `Z` on shapes RFC 3339 rejects, e.g. without seconds
        let with_offset = match s.strip_suffix('Z') {
            Some(prefix) => format!("{prefix}+0000"),
            None => s.to_string(),
        };
        if let Some(dt) = ZONED_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(&with_offset, fmt).ok())
        {
            return StartTime::Zoned(dt.with_timezone(&Utc));
        }

        if let Some(naive) = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        {
            return StartTime::Naive(naive);
        }

        // a bare date is midnight UTC
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| StartTime::Zoned(midnight.and_utc()))
            .unwrap_or_else(|| StartTime::Invalid(s.to_string()))
    }

    pub fn from_millis(ms: i64) -> Self {
        Utc.timestamp_millis_opt(ms)
            .single()
            .map(StartTime::Zoned)
            .unwrap_or_else(|| StartTime::Invalid(ms.to_string()))
    }
}

impl Serialize for StartTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StartTime::Zoned(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            StartTime::Naive(dt) => {
                serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            StartTime::Invalid(raw) => serializer.serialize_str(raw),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
    Unreadable(serde::de::IgnoredAny),
}

impl<'de> Deserialize<'de> for StartTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Timestamp::deserialize(deserializer)? {
            Timestamp::Millis(ms) => StartTime::from_millis(ms),
            Timestamp::FractionalMillis(ms) if ms.is_finite() => StartTime::from_millis(ms as i64),
            Timestamp::FractionalMillis(ms) => StartTime::Invalid(ms.to_string()),
            Timestamp::Text(s) => StartTime::parse(&s),
            Timestamp::Unreadable(_) => StartTime::default(),
        })
    }
}
