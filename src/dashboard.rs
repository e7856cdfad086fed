//! Dashboard state and the operations that drive it: startup, day selection, refresh
use crate::error::user_message;
use crate::map::MapView;
use crate::metrics::TrackMetrics;
use crate::reading::{derive_days, normalize_days, track_for_day, Reading, TrackFilter};
use crate::services::ReadingSource;
use crate::Error;
use log::{debug, error, info};

/// Padding in pixels kept around a route when the map is fitted to it
pub const ROUTE_PADDING: u32 = 24;

/// Everything the dashboard shows. Each operation runs to completion before returning, failures
/// are logged and turned into the banner message rather than returned.
pub struct Dashboard {
    source: Box<dyn ReadingSource>,
    recent_limit: usize,
    days_limit: usize,
    rows: Vec<Reading>,
    available_days: Vec<String>,
    selected_day: Option<String>,
    error_message: String,
    metrics: TrackMetrics,
    map: MapView,
}

impl Dashboard {
    pub fn new(source: Box<dyn ReadingSource>, recent_limit: usize, days_limit: usize) -> Self {
        Dashboard {
            source,
            recent_limit,
            days_limit,
            rows: Vec::new(),
            available_days: Vec::new(),
            selected_day: None,
            error_message: String::new(),
            metrics: TrackMetrics::default(),
            map: MapView::default(),
        }
    }

    /// Most recent readings batch shown in the table
    pub fn rows(&self) -> &[Reading] {
        &self.rows
    }

    pub fn available_days(&self) -> &[String] {
        &self.available_days
    }

    pub fn selected_day(&self) -> Option<&str> {
        self.selected_day.as_deref()
    }

    /// Banner text, empty when the last operation succeeded
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn metrics(&self) -> &TrackMetrics {
        &self.metrics
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// Initial load: recent readings, the day list and the most recent day's track
    pub fn load(&mut self) {
        self.error_message.clear();
        let recent = match self.source.recent(self.recent_limit) {
            Ok(rows) => rows,
            Err(e) => return self.report(e),
        };
        self.rows = recent;

        self.available_days = match self.source.available_days(self.days_limit) {
            Ok(days) => normalize_days(days),
            Err(e) => {
                // the endpoint is optional so this never reaches the banner
                debug!("Day listing unavailable ({}), deriving days from readings", e);
                derive_days(&self.rows)
            }
        };
        info!(
            "Loaded {} readings covering {} days",
            self.rows.len(),
            self.available_days.len()
        );

        self.selected_day = self.available_days.first().cloned();
        if let Some(day) = self.selected_day.clone() {
            self.load_track_for_day(&day);
        }
    }

    /// Select a day to draw, `None` is the empty option and just clears the map
    pub fn select_day(&mut self, day: Option<&str>) {
        self.selected_day = day.filter(|d| !d.is_empty()).map(String::from);
        match self.selected_day.clone() {
            Some(day) => self.load_track_for_day(&day),
            None => self.clear_route(),
        }
    }

    /// Fetch the full track, keep the readings from `day` and draw them
    pub fn load_track_for_day(&mut self, day: &str) {
        self.error_message.clear();
        match self.source.track(&TrackFilter::ascending()) {
            Ok(items) => {
                let points = track_for_day(items, day);
                debug!("{} readings on {}", points.len(), day);
                self.render(&points);
            }
            Err(e) => {
                self.report(e);
                self.clear_route();
            }
        }
    }

    /// Replace whatever route is drawn with `points` and recompute the metrics
    pub fn render(&mut self, points: &[Reading]) {
        self.map.clear_route();
        if points.is_empty() {
            self.metrics = TrackMetrics::default();
            return;
        }

        let locations: Vec<_> = points.iter().map(Reading::location).collect();
        self.map.draw_route(&locations);
        self.metrics = TrackMetrics::from_points(points);
        self.map.fit_route(ROUTE_PADDING);
    }

    /// Remove the route and zero the metrics
    pub fn clear_route(&mut self) {
        self.render(&[]);
    }

    /// Re-fetch the readings table. Days are only derived from it when none are known yet.
    pub fn refresh(&mut self) {
        self.error_message.clear();
        match self.source.recent(self.recent_limit) {
            Ok(rows) => {
                self.rows = rows;
                if self.available_days.is_empty() {
                    self.available_days = derive_days(&self.rows);
                }
            }
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, err: Error) {
        error!("{}", err);
        self.error_message = user_message(&err);
    }
}
