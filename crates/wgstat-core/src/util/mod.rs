//! Utility modules for wgstat.

mod duration;

pub use duration::{DurationParseError, parse_duration};
