//! Reading records returned by the tracker backend and the day/track derivations built on them
use crate::gps::Location;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One GPS sample reported by a device
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: i64,
    #[serde(default)]
    pub device_id: String,
    pub lat: f64,
    pub lon: f64,
    /// altitude in meters
    #[serde(default)]
    pub alt_m: Option<f64>,
    /// capture time reported by the device (ISO-8601)
    #[serde(default)]
    pub read_at: Option<String>,
    /// ingestion time recorded by the server (ISO-8601)
    #[serde(default)]
    pub ts: Option<String>,
}

impl Reading {
    pub fn location(&self) -> Location {
        let mut loc = Location::new(self.lat, self.lon);
        loc.set_altitude(self.alt_m);
        loc
    }

    /// Calendar day (YYYY-MM-DD) of the capture timestamp
    pub fn day(&self) -> Option<&str> {
        self.read_at.as_deref().and_then(day_of)
    }
}

/// Envelope used by the list endpoints
#[derive(Debug, Deserialize)]
pub struct ReadingBatch {
    pub items: Vec<Reading>,
}

/// Payload sent to the ingestion endpoint
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewReading {
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Sort order understood by the track endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional constraints for a track request, unset fields are left off the query
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackFilter {
    pub device: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub order: Option<SortOrder>,
}

impl TrackFilter {
    /// Every reading the backend has, oldest first
    pub fn ascending() -> Self {
        TrackFilter {
            order: Some(SortOrder::Asc),
            ..Default::default()
        }
    }
}

/// Return the date portion of an ISO-8601 timestamp
pub fn day_of(timestamp: &str) -> Option<&str> {
    timestamp.get(..10)
}

/// Distinct capture days found in the readings, most recent first
pub fn derive_days(readings: &[Reading]) -> Vec<String> {
    readings
        .iter()
        .filter_map(|r| r.day())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .rev()
        .map(String::from)
        .collect()
}

/// Bring a day list from any source into day set order: deduplicated, most recent first
pub fn normalize_days<I, S>(days: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    days.into_iter()
        .map(Into::into)
        .filter(|d: &String| !d.is_empty())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .rev()
        .collect()
}

/// Keep the readings captured on `day` and order them by capture time.
///
/// Readings without a capture timestamp are dropped. The sort is stable so readings sharing
/// a timestamp keep the order the backend returned them in.
pub fn track_for_day(readings: Vec<Reading>, day: &str) -> Vec<Reading> {
    let mut track: Vec<Reading> = readings
        .into_iter()
        .filter(|r| r.day() == Some(day))
        .collect();
    track.sort_by(|a, b| a.read_at.cmp(&b.read_at));
    track
}
