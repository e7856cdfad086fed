//! Fetch GPS readings from the tracker backend
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::reading::{NewReading, Reading, TrackFilter};
use crate::Error;
mod rest;
pub use rest::RestClient;

/// trait that defines where the dashboard gets its readings from
pub trait ReadingSource {
    /// Most recent readings across all days, newest first
    fn recent(&self, limit: usize) -> Result<Vec<Reading>, Error>;

    /// Readings matching the filter
    fn track(&self, filter: &TrackFilter) -> Result<Vec<Reading>, Error>;

    /// Calendar days (YYYY-MM-DD) that have readings. Sources are allowed to not support this,
    /// callers should derive the days from readings they already hold when it fails.
    fn available_days(&self, limit: usize) -> Result<Vec<String>, Error>;

    /// Submit a new reading, returns whatever the backend reports back
    fn ingest(&self, reading: &NewReading) -> Result<serde_json::Value, Error>;
}

pub fn new_reading_source_handler(
    config: &ServiceConfig,
) -> Result<Box<dyn ReadingSource>, Error> {
    match config.handler() {
        "rest" => Ok(Box::new(RestClient::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no reading source handler exists for: {}",
            config.handler()
        ))),
    }
}
