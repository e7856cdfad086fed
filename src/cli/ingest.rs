//! Define the ingest subcommand
use crate::config::Config;
use crate::metrics::parse_timestamp;
use crate::reading::NewReading;
use log::info;
use structopt::StructOpt;

/// Send a single reading to the backend's ingest endpoint (requires an ingest token)
#[derive(Debug, StructOpt)]
pub struct IngestOpts {
    /// Latitude in degrees
    #[structopt(long, allow_hyphen_values = true)]
    lat: f64,
    /// Longitude in degrees
    #[structopt(long, allow_hyphen_values = true)]
    lon: f64,
    /// Altitude in meters
    #[structopt(long, allow_hyphen_values = true)]
    alt: Option<f64>,
    /// Capture time as an ISO-8601 timestamp, the server uses its own clock when omitted
    #[structopt(long, parse(try_from_str = parse_time))]
    time: Option<String>,
}

fn parse_time(src: &str) -> Result<String, String> {
    match parse_timestamp(src) {
        Some(_) => Ok(src.to_string()),
        None => Err(format!("not an ISO-8601 timestamp: {}", src)),
    }
}

pub fn ingest_command(config: Config, opts: IngestOpts) -> Result<(), Box<dyn std::error::Error>> {
    let source = config.get_reading_source()?;
    let reading = NewReading {
        lat: opts.lat,
        lon: opts.lon,
        alt: opts.alt,
        time: opts.time,
    };
    let created = source.ingest(&reading)?;
    info!("Ingested reading at {}, {}", reading.lat, reading.lon);
    println!("{}", serde_json::to_string_pretty(&created)?);

    Ok(())
}
