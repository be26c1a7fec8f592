//! Send an email when a student wearing a SmartTag is getting close to home.
//!

use clap::{crate_authors, crate_version, Parser};
use eyre::Result;
use tracing::{info, trace};

use tagwatch::{load_config, run_every, run_once, LogOnly, Notifier, Opts, SmtpMailer};
use tagwatch_common::init_logging;
use tagwatch_sources::SmartTag;

/// Binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

fn main() -> Result<()> {
    let opts = Opts::parse();

    if opts.version {
        println!(
            "{}/{} by {}\n{}\n{}",
            NAME,
            VERSION,
            AUTHORS,
            tagwatch_common::version(),
            tagwatch_sources::version()
        );
        return Ok(());
    }

    // Initialise logging early
    //
    init_logging(NAME, opts.use_tree, opts.use_file.clone())?;
    trace!("Logging initialised.");

    // Everything is checked here, bail out on the first problem.
    //
    let cfg = load_config(opts.config.as_deref())?;

    let site = SmartTag::new()?.with_base_url(&cfg.base_url);
    let notifier: Box<dyn Notifier> = if opts.dry_run {
        info!("Dry run, nothing will be sent.");
        Box::new(LogOnly)
    } else {
        Box::new(SmtpMailer::new(&cfg.mail)?)
    };

    // Failures of an invocation are only logged.
    //
    match opts.every.or(cfg.schedule) {
        Some(interval) => {
            run_every(interval, &site, notifier.as_ref(), &cfg, None);
        }
        None => {
            let outcome = run_once(&site, notifier.as_ref(), &cfg);
            trace!("outcome = {outcome:?}");
        }
    }
    Ok(())
}
