//! Request readings from the tracker's REST API
use super::ReadingSource;
use crate::config::{FromServiceConfig, ServiceConfig};
use crate::reading::{NewReading, Reading, ReadingBatch, TrackFilter};
use crate::{set_int_param_from_config, set_string_param_from_config, Error};
use log::{debug, trace, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::time::Duration;

/// Defines the connection parameters for the tracker backend
#[derive(Clone, Debug)]
pub struct RestClient {
    base_url: String,
    /// only request readings for this device when not empty
    device: String,
    /// bearer token required by the ingest endpoint
    ingest_token: String,
    timeout_secs: u64,
}

impl RestClient {
    pub fn new(base_url: String, device: String) -> Self {
        RestClient {
            base_url,
            device,
            ..Default::default()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn set_ingest_token(&mut self, token: String) {
        self.ingest_token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn client(&self) -> Result<Client, Error> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?)
    }

    fn recent_request(&self, client: &Client, limit: usize) -> RequestBuilder {
        let mut query = vec![("limit", limit.to_string())];
        if !self.device.is_empty() {
            query.push(("device", self.device.clone()));
        }
        client.get(&self.url("readings/recent")).query(&query)
    }

    fn track_request(&self, client: &Client, filter: &TrackFilter) -> RequestBuilder {
        let mut query = Vec::new();
        // a device given by the caller wins over the configured one
        let device = filter
            .device
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(self.device.as_str());
        if !device.is_empty() {
            query.push(("device", device.to_string()));
        }
        if let Some(start) = &filter.start {
            query.push(("start", start.clone()));
        }
        if let Some(end) = &filter.end {
            query.push(("end", end.clone()));
        }
        if let Some(order) = filter.order {
            query.push(("order", order.to_string()));
        }
        client.get(&self.url("readings/track")).query(&query)
    }

    fn days_request(&self, client: &Client, limit: usize) -> RequestBuilder {
        let mut query = vec![("limit", limit.to_string())];
        if !self.device.is_empty() {
            query.push(("device", self.device.clone()));
        }
        client.get(&self.url("readings/days")).query(&query)
    }

    fn ingest_request(&self, client: &Client, reading: &NewReading) -> Result<RequestBuilder, Error> {
        if self.ingest_token.is_empty() {
            return Err(Error::MissingConfigurationValue(
                "readings.ingest_token".to_string(),
            ));
        }
        Ok(client
            .post(&self.url("ingest"))
            .bearer_auth(&self.ingest_token)
            .json(reading))
    }
}

/// Send the request once and turn non-success statuses into errors
fn send(request: RequestBuilder, endpoint: &str) -> Result<Response, Error> {
    let resp = request.send()?;
    trace!("[{}] {} -> {}", endpoint, resp.url(), resp.status());
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(Error::RequestError(resp.status(), endpoint.to_string()))
    }
}

impl Default for RestClient {
    fn default() -> Self {
        RestClient {
            base_url: "http://localhost:8000".to_string(),
            device: String::new(),
            ingest_token: String::new(),
            timeout_secs: 30,
        }
    }
}

impl FromServiceConfig for RestClient {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        let mut base = Self::default();
        for key in config.parameters() {
            match key.as_ref() {
                "base_url" => set_string_param_from_config!(base, base_url, config),
                "device" => set_string_param_from_config!(base, device, config),
                "ingest_token" => set_string_param_from_config!(base, ingest_token, config),
                "timeout_secs" => set_int_param_from_config!(base, timeout_secs, config, u64),
                _ => warn!(
                    "unknown configuration parameter for RestClient: {}={:?}",
                    key,
                    config.get_parameter(key)
                ),
            }
        }
        base.device = base.device.trim().to_string();

        Ok(base)
    }
}

impl ReadingSource for RestClient {
    fn recent(&self, limit: usize) -> Result<Vec<Reading>, Error> {
        let client = self.client()?;
        let batch: ReadingBatch = send(self.recent_request(&client, limit), "recent")?.json()?;
        debug!("Fetched {} recent readings", batch.items.len());
        Ok(batch.items)
    }

    fn track(&self, filter: &TrackFilter) -> Result<Vec<Reading>, Error> {
        let client = self.client()?;
        let batch: ReadingBatch = send(self.track_request(&client, filter), "track")?.json()?;
        debug!("Fetched {} track readings", batch.items.len());
        Ok(batch.items)
    }

    fn available_days(&self, limit: usize) -> Result<Vec<String>, Error> {
        let client = self.client()?;
        let days: Vec<String> = send(self.days_request(&client, limit), "days")?.json()?;
        debug!("Backend reported {} days with readings", days.len());
        Ok(days)
    }

    fn ingest(&self, reading: &NewReading) -> Result<serde_json::Value, Error> {
        let client = self.client()?;
        let created = send(self.ingest_request(&client, reading)?, "ingest")?.json()?;
        Ok(created)
    }
}
