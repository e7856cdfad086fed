//! Define the application's command line interface
use crate::config::Config;
use chrono::NaiveDate;
use simplelog::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

mod dashboard;
use dashboard::{dashboard_command, DashboardOpts};
mod days;
use days::{days_command, DaysOpts};
mod ingest;
use ingest::{ingest_command, IngestOpts};
mod recent;
use recent::{recent_command, RecentOpts};
mod track;
use track::{track_command, TrackOpts};

/// Browse GPS readings and daily tracks reported by an IoT tracker
#[derive(Debug, StructOpt)]
#[structopt(name = "gps-dashboard")]
pub struct Cli {
    /// Set logging level to debug, use a second time (e.g. -vv) to set logging to trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Suppress info logging messages use a second time (e.g. -qq) to hide warnings
    #[structopt(short, long, parse(from_occurrences))]
    quiet: i32,
    /// Config file to use instead of the one in the user's config directory
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    #[structopt(subcommand)]
    cmd: Command,
}

impl Cli {
    /// Return the verbose flag counts as a log level filter
    pub fn verbosity(&self, default: LevelFilter) -> LevelFilter {
        if self.quiet == 1 {
            LevelFilter::Warn
        } else if self.quiet > 1 {
            LevelFilter::Error
        } else if self.verbose == 1 {
            LevelFilter::Debug
        } else if self.verbose > 1 {
            LevelFilter::Trace
        } else {
            default
        }
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }

    /// True when the subcommand takes over the terminal, logs have to go elsewhere then
    pub fn is_interactive(&self) -> bool {
        matches!(self.cmd, Command::Dashboard(_))
    }

    /// Consume options struct and return the result of subcommand execution
    pub fn execute_subcommand(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        self.cmd.execute(config)
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Open the interactive dashboard
    #[structopt(name = "dashboard")]
    Dashboard(DashboardOpts),
    /// List the days that have readings
    #[structopt(name = "days")]
    Days(DaysOpts),
    /// Send a reading to the backend, useful to create demo data
    #[structopt(name = "ingest")]
    Ingest(IngestOpts),
    /// Print the most recent readings
    #[structopt(name = "recent")]
    Recent(RecentOpts),
    /// Show the metrics and route map for a single day
    #[structopt(name = "track")]
    Track(TrackOpts),
}

impl Command {
    /// Consume enum variant and return the result of the command's execution
    fn execute(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Command::Dashboard(opts) => dashboard_command(config, opts),
            Command::Days(opts) => days_command(config, opts),
            Command::Ingest(opts) => ingest_command(config, opts),
            Command::Recent(opts) => recent_command(config, opts),
            Command::Track(opts) => track_command(config, opts),
        }
    }
}

fn parse_date(src: &str) -> Result<NaiveDate, chrono::format::ParseError> {
    NaiveDate::parse_from_str(src, "%Y-%m-%d")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags() {
        let cli = Cli::from_iter(&["gps-dashboard", "-vv", "days"]);
        assert_eq!(cli.verbosity(LevelFilter::Info), LevelFilter::Trace);
        let cli = Cli::from_iter(&["gps-dashboard", "-q", "days"]);
        assert_eq!(cli.verbosity(LevelFilter::Info), LevelFilter::Warn);
        let cli = Cli::from_iter(&["gps-dashboard", "recent"]);
        assert_eq!(cli.verbosity(LevelFilter::Info), LevelFilter::Info);
        assert!(!cli.is_interactive());
    }

    #[test]
    fn dashboard_is_interactive() {
        let cli = Cli::from_iter(&["gps-dashboard", "-c", "/tmp/x.yml", "dashboard"]);
        assert!(cli.is_interactive());
        assert_eq!(cli.config_path(), Some(&PathBuf::from("/tmp/x.yml")));
    }

    #[test]
    fn track_day_must_be_a_date() {
        assert!(Cli::from_iter_safe(&["gps-dashboard", "track", "2024-01-02"]).is_ok());
        assert!(Cli::from_iter_safe(&["gps-dashboard", "track", "yesterday"]).is_err());
    }
}
