//! In-memory command runner for testing collectors without a real `wg`.
//!
//! `MockRunner` answers every invocation with a canned outcome and records
//! the invocations it saw, so tests can run on any host and in CI.

use std::sync::Mutex;

use crate::collector::command::{CommandError, CommandFailure, Invocation};
use crate::collector::traits::CommandRunner;

/// Canned outcome of a mock run.
#[derive(Debug, Clone)]
enum Outcome {
    Output(Vec<u8>),
    Exit { code: i32, partial: Vec<u8> },
    Timeout { partial: Vec<u8> },
    NotFound,
}

/// Command runner returning a fixed result.
#[derive(Debug)]
pub struct MockRunner {
    outcome: Outcome,
    calls: Mutex<Vec<Invocation>>,
}

impl MockRunner {
    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Succeeds with `output` as stdout.
    pub fn with_output(output: impl Into<Vec<u8>>) -> Self {
        Self::with_outcome(Outcome::Output(output.into()))
    }

    /// Fails as if the process exited with `code` after printing `partial`.
    pub fn exiting(code: i32, partial: impl Into<Vec<u8>>) -> Self {
        Self::with_outcome(Outcome::Exit {
            code,
            partial: partial.into(),
        })
    }

    /// Fails as if the process was killed at its timeout after printing `partial`.
    pub fn timing_out(partial: impl Into<Vec<u8>>) -> Self {
        Self::with_outcome(Outcome::Timeout {
            partial: partial.into(),
        })
    }

    /// Fails as if the binary does not exist.
    pub fn not_found() -> Self {
        Self::with_outcome(Outcome::NotFound)
    }

    /// Invocations received so far.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, CommandError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }

        match &self.outcome {
            Outcome::Output(out) => Ok(out.clone()),
            Outcome::Exit { code, partial } => Err(invocation.error(
                CommandFailure::Exit(exit_status(*code)),
                partial.clone(),
            )),
            Outcome::Timeout { partial } => Err(invocation.error(
                CommandFailure::Timeout(invocation.timeout),
                partial.clone(),
            )),
            Outcome::NotFound => Err(invocation.error(
                CommandFailure::Spawn(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "No such file or directory",
                )),
                Vec::new(),
            )),
        }
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    // Wait status encodes the exit code in the second byte.
    std::process::ExitStatus::from_raw((code & 0xff) << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code as u32)
}
