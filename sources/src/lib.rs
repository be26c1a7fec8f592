//! Module to deal with the sites we can fetch the tag status from.
//!
//! Each site knows how to build its request and decode what comes back into a list of
//! `StudentStatus`, everything is exposed through the `Fetchable` trait so callers (and tests)
//! do not care which one they use.
//!

use std::fmt::Debug;

// Re-export these modules for a shorted import path.
//
pub use access::*;
pub use error::*;
pub use status::*;

mod access;
mod error;
mod status;

#[macro_use]
mod macros;

/// This trait enables us to manage different ways of connecting and fetching data under
/// a single interface.
///
pub trait Fetchable: Debug {
    /// Return site's name
    fn name(&self) -> String;
    /// Fetch the current statuses for the given student, exactly one attempt
    fn fetch(&self, student_id: i64) -> Result<Vec<StudentStatus>, AccessError>;
}

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
