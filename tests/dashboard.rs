use gps_dashboard::reading::{NewReading, TrackFilter};
use gps_dashboard::services::ReadingSource;
use gps_dashboard::{Dashboard, Error, Reading};
use reqwest::StatusCode;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// In-memory backend whose responses can be changed between dashboard operations. Failures are
/// stored as HTTP status codes.
struct Backend {
    recent: RefCell<Result<Vec<Reading>, u16>>,
    track: RefCell<Result<Vec<Reading>, u16>>,
    /// `None` behaves like a backend without the days endpoint
    days: RefCell<Option<Vec<String>>>,
    recent_calls: Cell<usize>,
    track_calls: Cell<usize>,
    last_filter: RefCell<Option<TrackFilter>>,
}

impl Default for Backend {
    fn default() -> Self {
        Backend {
            recent: RefCell::new(Ok(Vec::new())),
            track: RefCell::new(Ok(Vec::new())),
            days: RefCell::new(None),
            recent_calls: Cell::new(0),
            track_calls: Cell::new(0),
            last_filter: RefCell::new(None),
        }
    }
}

struct Source(Rc<Backend>);

fn failure(code: u16, endpoint: &str) -> Error {
    Error::RequestError(StatusCode::from_u16(code).unwrap(), endpoint.to_string())
}

impl ReadingSource for Source {
    fn recent(&self, _limit: usize) -> Result<Vec<Reading>, Error> {
        self.0.recent_calls.set(self.0.recent_calls.get() + 1);
        self.0.recent.borrow().clone().map_err(|c| failure(c, "recent"))
    }

    fn track(&self, filter: &TrackFilter) -> Result<Vec<Reading>, Error> {
        self.0.track_calls.set(self.0.track_calls.get() + 1);
        *self.0.last_filter.borrow_mut() = Some(filter.clone());
        self.0.track.borrow().clone().map_err(|c| failure(c, "track"))
    }

    fn available_days(&self, _limit: usize) -> Result<Vec<String>, Error> {
        self.0.days.borrow().clone().ok_or_else(|| failure(404, "days"))
    }

    fn ingest(&self, _reading: &NewReading) -> Result<serde_json::Value, Error> {
        Err(Error::Other("not supported".to_string()))
    }
}

fn reading(id: i64, lat: f64, lon: f64, read_at: &str) -> Reading {
    Reading {
        id,
        device_id: "tracker-1".to_string(),
        lat,
        lon,
        alt_m: Some(2240.0),
        read_at: Some(read_at.to_string()),
        ts: None,
    }
}

fn two_days() -> Vec<Reading> {
    vec![
        reading(4, 19.01, -99.0, "2024-01-03T09:00:00Z"),
        reading(3, 19.002, -99.0, "2024-01-02T10:20:00Z"),
        reading(2, 19.001, -99.0, "2024-01-02T10:10:00Z"),
        reading(1, 19.0, -99.0, "2024-01-02T10:00:00Z"),
    ]
}

fn dashboard(backend: &Rc<Backend>) -> Dashboard {
    Dashboard::new(Box::new(Source(Rc::clone(backend))), 500, 1000)
}

#[test]
fn two_readings_on_one_day() {
    let rows = vec![
        reading(1, 19.0, -99.0, "2024-01-02T10:00:00Z"),
        reading(2, 19.001, -99.0, "2024-01-02T10:10:00Z"),
    ];
    let backend = Rc::new(Backend::default());
    *backend.recent.borrow_mut() = Ok(rows.clone());
    *backend.track.borrow_mut() = Ok(rows);

    let mut dash = dashboard(&backend);
    dash.load();

    assert_eq!(dash.error_message(), "");
    assert_eq!(dash.available_days(), ["2024-01-02"]);
    assert_eq!(dash.selected_day(), Some("2024-01-02"));
    let metrics = dash.metrics();
    assert_eq!(metrics.point_count, 2);
    assert!((metrics.duration_min - 10.0).abs() < 1e-9);
    assert!((metrics.distance_m - 111.19).abs() < 0.1);
    assert_eq!(dash.map().markers().len(), 2);
    assert_eq!(dash.map().markers()[0].label(), "Start");
    assert_eq!(dash.map().polyline().map(|p| p.len()), Some(2));
}

#[test]
fn startup_prefers_backend_day_list() {
    let backend = Rc::new(Backend::default());
    *backend.recent.borrow_mut() = Ok(two_days());
    *backend.track.borrow_mut() = Ok(two_days());
    *backend.days.borrow_mut() = Some(vec![
        "2024-01-02".to_string(),
        "2024-01-05".to_string(),
        "2024-01-03".to_string(),
    ]);

    let mut dash = dashboard(&backend);
    dash.load();

    assert_eq!(
        dash.available_days(),
        ["2024-01-05", "2024-01-03", "2024-01-02"]
    );
    assert_eq!(dash.selected_day(), Some("2024-01-05"));
    // nothing recorded that day
    assert_eq!(dash.metrics().point_count, 0);
    assert!(!dash.map().has_route());
    assert_eq!(
        *backend.last_filter.borrow(),
        Some(TrackFilter::ascending())
    );
}

#[test]
fn startup_with_no_readings_selects_nothing() {
    let backend = Rc::new(Backend::default());
    let mut dash = dashboard(&backend);
    dash.load();

    assert!(dash.available_days().is_empty());
    assert_eq!(dash.selected_day(), None);
    assert_eq!(backend.track_calls.get(), 0);
    assert_eq!(dash.error_message(), "");
}

#[test]
fn selecting_a_day_filters_and_orders_the_track() {
    let backend = Rc::new(Backend::default());
    *backend.recent.borrow_mut() = Ok(two_days());
    *backend.track.borrow_mut() = Ok(two_days());

    let mut dash = dashboard(&backend);
    dash.load();
    assert_eq!(dash.selected_day(), Some("2024-01-03"));
    assert_eq!(dash.metrics().point_count, 1);

    dash.select_day(Some("2024-01-02"));
    assert_eq!(dash.metrics().point_count, 3);
    assert!((dash.metrics().duration_min - 20.0).abs() < 1e-9);
    let line = dash.map().polyline().unwrap();
    let lats: Vec<f64> = line.iter().map(|l| l.latitude()).collect();
    assert_eq!(lats, vec![19.0, 19.001, 19.002]);
}

#[test]
fn selecting_the_empty_option_clears_without_fetching() {
    let backend = Rc::new(Backend::default());
    *backend.recent.borrow_mut() = Ok(two_days());
    *backend.track.borrow_mut() = Ok(two_days());

    let mut dash = dashboard(&backend);
    dash.load();
    dash.select_day(Some("2024-01-02"));
    assert!(dash.map().has_route());
    let calls = backend.track_calls.get();

    dash.select_day(None);
    assert_eq!(backend.track_calls.get(), calls);
    assert_eq!(dash.selected_day(), None);
    assert_eq!(dash.metrics().point_count, 0);
    assert_eq!(dash.metrics().distance_m, 0.0);
    assert_eq!(dash.metrics().duration_min, 0.0);
    assert!(!dash.map().has_route());

    // an empty string is the same as the empty option
    dash.select_day(Some("2024-01-02"));
    dash.select_day(Some(""));
    assert_eq!(dash.selected_day(), None);
    assert!(!dash.map().has_route());
}

#[test]
fn failed_refresh_keeps_previous_state() {
    let backend = Rc::new(Backend::default());
    *backend.recent.borrow_mut() = Ok(two_days());
    *backend.track.borrow_mut() = Ok(two_days());

    let mut dash = dashboard(&backend);
    dash.load();
    let rows_before = dash.rows().to_vec();
    let days_before = dash.available_days().to_vec();

    *backend.recent.borrow_mut() = Err(503);
    dash.refresh();

    assert_eq!(dash.rows(), rows_before.as_slice());
    assert_eq!(dash.available_days(), days_before.as_slice());
    assert!(!dash.error_message().is_empty());
    assert!(dash.error_message().contains("503"));

    // the banner is cleared by the next successful action
    *backend.recent.borrow_mut() = Ok(two_days());
    dash.refresh();
    assert_eq!(dash.error_message(), "");
}

#[test]
fn failed_startup_reports_the_error() {
    let backend = Rc::new(Backend::default());
    *backend.recent.borrow_mut() = Err(500);

    let mut dash = dashboard(&backend);
    dash.load();

    assert!(dash.rows().is_empty());
    assert!(dash.available_days().is_empty());
    assert_eq!(dash.error_message(), "[recent] request failed with code: 500 Internal Server Error");
    assert_eq!(backend.track_calls.get(), 0);
}

#[test]
fn refresh_never_replaces_a_known_day_list() {
    let backend = Rc::new(Backend::default());
    *backend.recent.borrow_mut() = Ok(two_days());
    *backend.days.borrow_mut() = Some(vec!["2023-12-31".to_string()]);

    let mut dash = dashboard(&backend);
    dash.load();
    assert_eq!(dash.available_days(), ["2023-12-31"]);

    dash.refresh();
    assert_eq!(dash.available_days(), ["2023-12-31"]);
    assert_eq!(backend.recent_calls.get(), 2);
}

#[test]
fn refresh_derives_days_when_none_are_known() {
    let backend = Rc::new(Backend::default());
    let mut dash = dashboard(&backend);
    dash.load();
    assert!(dash.available_days().is_empty());

    *backend.recent.borrow_mut() = Ok(two_days());
    dash.refresh();
    assert_eq!(dash.available_days(), ["2024-01-03", "2024-01-02"]);
    assert_eq!(dash.rows().len(), 4);
}

#[test]
fn failed_track_clears_the_route() {
    let backend = Rc::new(Backend::default());
    *backend.recent.borrow_mut() = Ok(two_days());
    *backend.track.borrow_mut() = Ok(two_days());

    let mut dash = dashboard(&backend);
    dash.load();
    dash.select_day(Some("2024-01-02"));
    assert!(dash.map().has_route());

    *backend.track.borrow_mut() = Err(502);
    dash.select_day(Some("2024-01-03"));
    assert!(dash.error_message().contains("[track]"));
    assert!(!dash.map().has_route());
    assert_eq!(dash.metrics().point_count, 0);
    assert_eq!(dash.selected_day(), Some("2024-01-03"));
}
