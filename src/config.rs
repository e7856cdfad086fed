//! Store application configuration that gets read from disk and the environment
use crate::services::{new_reading_source_handler, ReadingSource};
use crate::Error;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use simplelog::LevelFilter;
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::prelude::*;
use std::iter::Iterator;
use std::path::{Path, PathBuf};
use std::str::FromStr;

static CONFIG_DIR_NAME: &str = "gps-dashboard";
static CONFIG_FILE_NAME: &str = "config.yml";

/// Environment variables that override the readings service parameters
pub static ENV_API_BASE: &str = "GPS_DASHBOARD_API_BASE";
pub static ENV_DEVICE_ID: &str = "GPS_DASHBOARD_DEVICE_ID";
pub static ENV_INGEST_TOKEN: &str = "GPS_DASHBOARD_INGEST_TOKEN";

/// Defines the allowed keys under the services map
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Readings,
}

/// Type alias for clarity
pub type ServiceParameters = HashMap<String, Value>;

/// Configuration options for a single service of any type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    handler: String,
    #[serde(default)]
    configuration: ServiceParameters,
}

impl ServiceConfig {
    pub fn new(handler: String, configuration: ServiceParameters) -> Self {
        ServiceConfig {
            handler,
            configuration,
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn parameters(&self) -> impl Iterator<Item = &String> + '_ {
        self.configuration.keys()
    }

    pub fn get_parameter(&self, key: &str) -> Option<&Value> {
        self.configuration.get(key)
    }

    pub fn set_parameter(&mut self, key: &str, value: Value) {
        self.configuration.insert(key.to_string(), value);
    }

    pub fn get_parameter_as_string(&self, key: &str) -> Option<Result<String, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_str()
                .ok_or_else(|| {
                    Error::InvalidConfigurationValue(format!(
                        "invalid value for {}.{}, expected a string: {:?}",
                        &self.handler, key, value
                    ))
                })
                .map(|v| v.to_string())
        })
    }

    pub fn get_parameter_as_i64(&self, key: &str) -> Option<Result<i64, Error>> {
        self.configuration.get(key).map(|value| {
            value.as_i64().ok_or_else(|| {
                Error::InvalidConfigurationValue(format!(
                    "invalid value for {}.{}, expected an integer: {:?}",
                    &self.handler, key, value
                ))
            })
        })
    }
}

/// Build a service instance from its configuration block
pub trait FromServiceConfig: Sized {
    fn from_config(config: &ServiceConfig) -> Result<Self, Error>;
}

/// Set a string parameter on the service instance from a ServiceConfig instance
#[macro_export]
macro_rules! set_string_param_from_config {
    ($b:expr, $k:ident, $c:expr) => {
        if let Some(val) = $c.get_parameter_as_string(stringify!($k)) {
            $b.$k = val?
        }
    };
}

#[macro_export]
macro_rules! set_int_param_from_config {
    ($b:expr, $k:ident, $c:expr, $o:ident) => {
        if let Some(val) = $c.get_parameter_as_i64(stringify!($k)) {
            $b.$k = val? as $o
        }
    };
}

/// Configuration struct that we can create from the config file used
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        deserialize_with = "deserialize_level_filter",
        serialize_with = "serialize_level_filter",
        default = "default_level_filter"
    )]
    log_level: LevelFilter,
    /// how many readings to request for the table and the day fallback
    #[serde(default = "default_recent_limit")]
    recent_limit: usize,
    /// how many days to request from the day listing endpoint
    #[serde(default = "default_days_limit")]
    days_limit: usize,
    #[serde(default)]
    services: HashMap<ServiceType, ServiceConfig>,
}

impl Config {
    pub fn load<T: Read>(source: &mut T) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(source)
    }

    /// Read the config file at `path`, or the default location when no path is given. A
    /// missing default file is not an error, the built-in defaults are used instead.
    pub fn from_file(path: Option<&Path>) -> Result<Self, Error> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path(), false),
        };
        if !path.exists() {
            if required {
                return Err(Error::Other(format!(
                    "config file does not exist: {:?}",
                    path
                )));
            }
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let mut fp = File::open(&path)?;
        Ok(Self::load(&mut fp)?)
    }

    /// Apply any overrides present in the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`, blank values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = [
            (ENV_API_BASE, "base_url"),
            (ENV_DEVICE_ID, "device"),
            (ENV_INGEST_TOKEN, "ingest_token"),
        ];
        let readings = self
            .services
            .entry(ServiceType::Readings)
            .or_insert_with(default_readings_config);
        for &(var, key) in overrides.iter() {
            if let Some(value) = lookup(var) {
                let value = value.trim();
                if !value.is_empty() {
                    debug!("Using {} from the environment for readings.{}", var, key);
                    readings.set_parameter(key, Value::String(value.to_string()));
                }
            }
        }
        self
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    pub fn days_limit(&self) -> usize {
        self.days_limit
    }

    pub fn get_reading_source(&self) -> Result<Box<dyn ReadingSource>, Error> {
        match self.services.get(&ServiceType::Readings) {
            Some(cfg) => new_reading_source_handler(cfg),
            // the REST backend is the only source we know about so use it by default
            None => new_reading_source_handler(&default_readings_config()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_level_filter(),
            recent_limit: default_recent_limit(),
            days_limit: default_days_limit(),
            services: HashMap::new(),
        }
    }
}

/// Location of the config file when one isn't given on the command line
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Directory used for files the application writes, e.g. the dashboard log
pub fn data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_default().join(CONFIG_DIR_NAME)
}

fn default_readings_config() -> ServiceConfig {
    ServiceConfig::new("rest".to_string(), HashMap::new())
}

fn deserialize_level_filter<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    LevelFilter::from_str(&buf)
        .map_err(|_| serde::de::Error::custom(format!("invalid level value: {}", buf)))
}

fn serialize_level_filter<S>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&level.to_string())
}

fn default_level_filter() -> LevelFilter {
    LevelFilter::Info
}

fn default_recent_limit() -> usize {
    500
}

fn default_days_limit() -> usize {
    1000
}
