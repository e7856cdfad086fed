//! Define the days subcommand
use crate::config::Config;
use crate::reading::{derive_days, normalize_days};
use log::{debug, info};
use structopt::StructOpt;

/// List the calendar days that have readings, most recent first
#[derive(Debug, StructOpt)]
pub struct DaysOpts {
    /// Limit results returned to "N" days, defaults to the configured days_limit
    #[structopt(short, long)]
    number: Option<usize>,
}

pub fn days_command(config: Config, opts: DaysOpts) -> Result<(), Box<dyn std::error::Error>> {
    let source = config.get_reading_source()?;
    let limit = opts.number.unwrap_or_else(|| config.days_limit());
    let days = match source.available_days(limit) {
        Ok(days) => normalize_days(days),
        Err(e) => {
            // older backends don't have the days endpoint, use what the recent readings cover
            debug!("Day listing unavailable ({}), deriving days from readings", e);
            let recent = source.recent(config.recent_limit())?;
            info!(
                "Derived days from the {} most recent readings, older days may be missing",
                recent.len()
            );
            derive_days(&recent)
        }
    };

    for day in days.iter().take(limit) {
        println!("{}", day);
    }

    Ok(())
}
