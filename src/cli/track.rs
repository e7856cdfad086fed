//! Define the track subcommand
use super::parse_date;
use crate::config::Config;
use crate::dashboard::ROUTE_PADDING;
use crate::map::{MapView, RouteGeometry};
use crate::metrics::TrackMetrics;
use crate::reading::{track_for_day, TrackFilter};
use crate::services::visualization::{metrics_line, plot_route};
use chrono::NaiveDate;
use log::{info, warn};
use structopt::StructOpt;

/// Show distance, duration and point count for a day and draw its route on the terminal
#[derive(Debug, StructOpt)]
pub struct TrackOpts {
    /// Day to show (YYYY-MM-DD format)
    #[structopt(name = "DAY", parse(try_from_str = parse_date))]
    day: NaiveDate,
    /// Only print the metrics, do not draw the route map
    #[structopt(long)]
    no_map: bool,
}

pub fn track_command(config: Config, opts: TrackOpts) -> Result<(), Box<dyn std::error::Error>> {
    let source = config.get_reading_source()?;
    let day = opts.day.format("%Y-%m-%d").to_string();
    let points = track_for_day(source.track(&TrackFilter::ascending())?, &day);
    if points.is_empty() {
        warn!("No readings found for {}", day);
    }
    info!("Found {} readings for {}", points.len(), day);

    let metrics = TrackMetrics::from_points(&points);
    let mut map = MapView::default();
    map.show_geometry(&RouteGeometry::from_points(&points));
    map.fit_route(ROUTE_PADDING);
    let footer = format!("{}  {}", metrics_line(&metrics), map.viewport().osm_link());

    if opts.no_map || points.is_empty() {
        println!("{}", day);
        println!("{}", metrics_line(&metrics));
        println!("{}", map.viewport().osm_link());
    } else {
        plot_route(&map, &format!("Route for {}", day), &footer)?;
    }

    Ok(())
}
