//! Trip statistics derived from a day's track and their display formats
use crate::gps::{path_distance, Location};
use crate::reading::Reading;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;

/// Summary values shown below the map
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackMetrics {
    /// total path length in meters
    pub distance_m: f64,
    /// minutes between the first and last capture timestamps, may be negative
    pub duration_min: f64,
    pub point_count: usize,
}

impl TrackMetrics {
    pub fn from_points(points: &[Reading]) -> Self {
        let locations: Vec<Location> = points.iter().map(Reading::location).collect();
        TrackMetrics {
            distance_m: path_distance(&locations),
            duration_min: duration_minutes(points),
            point_count: points.len(),
        }
    }
}

/// Minutes elapsed between the first and last reading's capture time.
///
/// Zero when either end lacks a timestamp. An out of order track gives a negative value.
pub fn duration_minutes(points: &[Reading]) -> f64 {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 0.0,
    };
    let (start, end) = match (first.read_at.as_deref(), last.read_at.as_deref()) {
        (Some(start), Some(end)) => (start, end),
        _ => return 0.0,
    };
    match (parse_timestamp(start), parse_timestamp(end)) {
        (Some(t1), Some(t2)) => (t2 - t1).num_milliseconds() as f64 / 60000.0,
        _ => {
            warn!(
                "could not parse track timestamps '{}' and '{}', reporting zero duration",
                start, end
            );
            0.0
        }
    }
}

/// Parse an ISO-8601 timestamp, values without an offset are taken as UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| DateTime::<Utc>::from_utc(naive, Utc))
}

/// Format a distance, switching to kilometers past 1000 m
pub fn fmt_meters(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{:.0} m", meters)
    }
}

pub fn fmt_minutes(minutes: f64) -> String {
    format!("{:.0} min", minutes)
}
