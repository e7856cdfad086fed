//! Define the recent subcommand
use crate::config::Config;
use crate::services::visualization::table_cells;
use log::info;
use structopt::StructOpt;

/// Print the most recent readings reported to the backend
#[derive(Debug, StructOpt)]
pub struct RecentOpts {
    /// Limit results returned to "N" entries, defaults to the configured recent_limit
    #[structopt(short, long)]
    number: Option<usize>,
}

pub fn recent_command(config: Config, opts: RecentOpts) -> Result<(), Box<dyn std::error::Error>> {
    let source = config.get_reading_source()?;
    let limit = opts.number.unwrap_or_else(|| config.recent_limit());
    let rows = source.recent(limit)?;
    info!("Fetched {} readings", rows.len());

    println!("ID\tLat\tLon\tAlt\tread_at");
    if rows.is_empty() {
        println!("No data yet…");
    }
    for row in &rows {
        println!("{}", table_cells(row).join("\t"));
    }

    Ok(())
}
