//! Command-line options for the `tagwatch` driver.
//!
//! There is no sub-command, the job is meant to be started by a timer (cron, systemd, etc.).
//! `--every` makes it its own timer.
//!

use std::time::Duration;

use clap::{crate_authors, crate_description, crate_name, crate_version, Parser};

/// CLI options
#[derive(Debug, Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<String>,
    /// Do not send anything, only log what would be sent.
    #[clap(short = 'n', long)]
    pub dry_run: bool,
    /// Run periodically (e.g. "5m", "30s"), overrides `schedule` from the config.
    #[clap(short = 'e', long, value_parser = parse_every)]
    pub every: Option<Duration>,
    /// Hierarchical output for logs.
    #[clap(long)]
    pub use_tree: bool,
    /// Also log into hourly files in this directory.
    #[clap(long)]
    pub use_file: Option<String>,
    /// Display utility full version.
    #[clap(short = 'V', long)]
    pub version: bool,
}

/// Same rules as `schedule` in the configuration file, a zero interval is refused.
///
fn parse_every(s: &str) -> Result<Duration, String> {
    let every = humantime::parse_duration(s).map_err(|e| e.to_string())?;
    if every.is_zero() {
        return Err("interval must be greater than zero".to_string());
    }
    Ok(every)
}
