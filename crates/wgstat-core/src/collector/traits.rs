//! Abstractions for command execution to enable testing and mocking.
//!
//! The `CommandRunner` trait allows the collector to run the real `wg`
//! binary in production and canned output in tests.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::collector::command::{CommandError, CommandFailure, Invocation};

/// How often a running child is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How long to wait for the stdout reader after the child was killed.
const DRAIN_GRACE: Duration = Duration::from_millis(100);

/// Abstraction for running an external command and capturing its stdout.
pub trait CommandRunner: Send + Sync {
    /// Runs `invocation` to completion or until its timeout expires.
    ///
    /// # Returns
    /// The captured stdout (possibly empty) on success, or a [`CommandError`]
    /// holding the cause and any partial output.
    fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, CommandError>;
}

/// Real runner that spawns processes via `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a new `SystemRunner` instance.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, CommandError> {
        let (program, args) = invocation.argv();
        debug!("running {} {:?} (timeout {:?})", program, args, invocation.timeout);

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| invocation.error(CommandFailure::Spawn(e), Vec::new()))?;

        // Drain stdout concurrently so a full pipe cannot stall the child.
        let (tx, rx) = mpsc::channel();
        if let Some(mut stdout) = child.stdout.take() {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stdout.read_to_end(&mut buf);
                let _ = tx.send(buf);
            });
        } else {
            let _ = tx.send(Vec::new());
        }

        // A timeout too large to represent as an instant never expires.
        let deadline = Instant::now().checked_add(invocation.timeout);
        let outcome = loop {
            match child.try_wait() {
                Ok(Some(status)) if status.success() => break Ok(()),
                Ok(Some(status)) => break Err(CommandFailure::Exit(status)),
                Ok(None) => {
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        warn!("{} timed out after {:?}, killing", program, invocation.timeout);
                        let _ = child.kill();
                        let _ = child.wait();
                        break Err(CommandFailure::Timeout(invocation.timeout));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    break Err(CommandFailure::Wait(e));
                }
            }
        };

        match outcome {
            Ok(()) => {
                let drained = match deadline {
                    Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
                    None => rx.recv().map_err(mpsc::RecvTimeoutError::from),
                };
                match drained {
                    Ok(output) => Ok(output),
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        // The child exited but something it started still holds stdout.
                        warn!("{} output still open after {:?}", program, invocation.timeout);
                        Err(invocation.error(
                            CommandFailure::Timeout(invocation.timeout),
                            Vec::new(),
                        ))
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => Ok(Vec::new()),
                }
            }
            Err(cause) => {
                // A grandchild may still hold the pipe open; don't wait on it forever.
                let partial = rx.recv_timeout(DRAIN_GRACE).unwrap_or_default();
                Err(invocation.error(cause, partial))
            }
        }
    }
}
