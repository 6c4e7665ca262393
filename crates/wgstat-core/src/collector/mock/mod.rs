//! Mock command runner and canned `wg` output for tests.

pub mod runner;
pub mod scenarios;

pub use runner::MockRunner;
