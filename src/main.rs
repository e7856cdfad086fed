use gps_dashboard::cli::Cli;
use gps_dashboard::config::{data_dir, Config};
use simplelog::{Config as LogConfig, TermLogger, TerminalMode, WriteLogger};
use std::fs::{create_dir_all, File};
use structopt::StructOpt;

static DASHBOARD_LOG_NAME: &str = "dashboard.log";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Cli::from_args();
    let config = Config::from_file(opt.config_path().map(|p| p.as_path()))?.with_env_overrides();
    let level_filter = opt.verbosity(config.log_level());

    if opt.is_interactive() {
        // the dashboard owns the terminal so log messages go to a file instead
        let log_dir = data_dir();
        if !log_dir.exists() {
            create_dir_all(&log_dir)?;
        }
        let log_file = File::create(log_dir.join(DASHBOARD_LOG_NAME))?;
        WriteLogger::init(level_filter, LogConfig::default(), log_file)?;
    } else {
        TermLogger::init(level_filter, LogConfig::default(), TerminalMode::Mixed)?;
    }

    // execute any subcommands
    opt.execute_subcommand(config)
}
