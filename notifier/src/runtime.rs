//! One invocation of the job, and the loop around it.
//!
//! An invocation is: fetch the statuses once, decide, notify if needed.  It never fails, any
//! error along the way is logged and the invocation ends there.  Nothing survives from one
//! invocation to the next, running every 5 minutes means possibly notifying every 5 minutes.
//!

use std::thread;
use std::time::{Duration, Instant};

use eyre::Result;
use tracing::{error, info, trace};

use tagwatch_sources::Fetchable;

use crate::{evaluate, Config, Decision, Notification, Notifier};

/// What happened during one invocation.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Decided, nothing to send
    Decided(Decision),
    /// Decided and the notification went out
    Notified(Decision),
    /// Something broke, the message has already been logged
    Failed(String),
}

/// Run exactly one invocation.
///
#[tracing::instrument(skip_all, fields(site = %site.name(), notifier = %notifier.name()))]
pub fn run_once(site: &dyn Fetchable, notifier: &dyn Notifier, cfg: &Config) -> Outcome {
    match invoke(site, notifier, cfg) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{e}");
            Outcome::Failed(e.to_string())
        }
    }
}

fn invoke(site: &dyn Fetchable, notifier: &dyn Notifier, cfg: &Config) -> Result<Outcome> {
    let statuses = site.fetch(cfg.student_id)?;

    let decision = evaluate(&statuses, &cfg.settings);
    match decision {
        Decision::NoData => {
            error!("{decision}");
            Ok(Outcome::Decided(decision))
        }
        Decision::WithinThreshold { meters } => {
            let note = Notification::arriving(cfg.student_id, meters, &cfg.mail.to);
            notifier.notify(&note)?;

            info!("Student arriving shortly. Email sent.");
            Ok(Outcome::Notified(decision))
        }
        _ => {
            info!("{decision}");
            Ok(Outcome::Decided(decision))
        }
    }
}

/// Run one invocation every `interval`, forever or `count` times.
///
/// The interval is measured from the start of an invocation to the start of the next one.
///
#[tracing::instrument(skip(site, notifier, cfg))]
pub fn run_every(
    interval: Duration,
    site: &dyn Fetchable,
    notifier: &dyn Notifier,
    cfg: &Config,
    count: Option<usize>,
) -> Vec<Outcome> {
    info!("Running every {}", humantime::format_duration(interval));

    let mut outcomes = vec![];
    let mut runs = 0;
    loop {
        let start = Instant::now();

        let outcome = run_once(site, notifier, cfg);
        trace!("run {runs}: {outcome:?}");
        runs += 1;

        // Only keep them when we stop at some point
        //
        if count.is_some() {
            outcomes.push(outcome);
        }
        if count.is_some_and(|count| runs >= count) {
            break;
        }

        let spent = start.elapsed();
        if let Some(wait) = interval.checked_sub(spent) {
            thread::sleep(wait);
        }
    }
    outcomes
}
