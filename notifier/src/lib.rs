//! Library part of the `tagwatch` utility.
//!
//! A student wears a SmartTag, the bus reports its position and we want an email when the
//! student gets close to home.  Every invocation is independent:
//!
//! 1. fetch the statuses of the student (`tagwatch-sources`)
//! 2. decide from the first status whether the student is on the bus and close enough
//! 3. send the email if so
//!
//! The binary runs this once, or periodically with `--every`.
//!

/// Re-export
///
pub use cli::*;
pub use config::*;
pub use decision::*;
pub use error::*;
pub use notify::*;
pub use runtime::*;

mod cli;
mod config;
mod decision;
mod error;
mod notify;
mod runtime;
