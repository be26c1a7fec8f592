//! Access methods, one per site we know how to talk to.
//!

pub use smarttag::*;

mod smarttag;
