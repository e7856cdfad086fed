//! Draw the dashboard and routes directly on the terminal
use crate::map::MapView;
use crate::metrics::{fmt_meters, fmt_minutes, TrackMetrics};
use crate::reading::Reading;
mod terminal;
pub use self::terminal::{plot_route, TerminalDashboard};

/// Label of the day list entry that clears the map
pub static EMPTY_DAY_OPTION: &str = "— select —";

pub static OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Entries of the day picker, the empty option always comes first
pub fn day_options(days: &[String]) -> Vec<&str> {
    std::iter::once(EMPTY_DAY_OPTION)
        .chain(days.iter().map(String::as_str))
        .collect()
}

/// Cells shown for a reading in the readings table
pub fn table_cells(reading: &Reading) -> [String; 5] {
    [
        reading.id.to_string(),
        reading.lat.to_string(),
        reading.lon.to_string(),
        reading.alt_m.map(|a| a.to_string()).unwrap_or_default(),
        reading.read_at.clone().unwrap_or_default(),
    ]
}

pub fn metrics_line(metrics: &TrackMetrics) -> String {
    format!(
        "Distance: {} | Duration: {} | Points: {}",
        fmt_meters(metrics.distance_m),
        fmt_minutes(metrics.duration_min),
        metrics.point_count
    )
}

/// Line segments of the drawn route as (x1, y1, x2, y2) in lon/lat
pub fn route_segments(map: &MapView) -> Vec<(f64, f64, f64, f64)> {
    map.polyline()
        .map(|line| {
            line.windows(2)
                .map(|w| {
                    (
                        w[0].longitude(),
                        w[0].latitude(),
                        w[1].longitude(),
                        w[1].latitude(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}
