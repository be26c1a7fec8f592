//! This library is there to share some common code amongst all tagwatch modules.
//!
//! - `Location`, parsing positions reported by the tags and computing distances
//! - logging initialisation
//! - configuration file loading
//!

mod config;
mod location;
mod logging;
#[macro_use]
mod macros;

use clap::{crate_name, crate_version};
pub use config::*;
pub use location::*;
pub use logging::*;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
