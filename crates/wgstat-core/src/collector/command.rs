//! Description of a single `wg` invocation and its failure modes.

use std::process::ExitStatus;
use std::time::Duration;

use crate::config::WireguardConfig;

/// Program used to elevate privileges when `use_sudo` is set.
pub const SUDO: &str = "sudo";

/// One external command run: program, arguments, time bound, elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub binary: String,
    pub args: Vec<String>,
    pub timeout: Duration,
    pub use_sudo: bool,
}

impl Invocation {
    pub fn new(
        binary: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        timeout: Duration,
        use_sudo: bool,
    ) -> Self {
        Self {
            binary: binary.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
            use_sudo,
        }
    }

    /// Builds the `wg` invocation for the configured output format.
    pub fn from_config(config: &WireguardConfig) -> Self {
        Self::new(
            config.binary.clone(),
            config.format.command_args().iter().copied(),
            config.timeout,
            config.use_sudo,
        )
    }

    /// Returns the program to execute and its argument vector.
    ///
    /// With `use_sudo` the program becomes `sudo` and the original binary
    /// is prepended to the arguments.
    pub fn argv(&self) -> (String, Vec<String>) {
        if self.use_sudo {
            let mut args = Vec::with_capacity(self.args.len() + 1);
            args.push(self.binary.clone());
            args.extend(self.args.iter().cloned());
            (SUDO.to_string(), args)
        } else {
            (self.binary.clone(), self.args.clone())
        }
    }

    /// Wraps a failure cause into a [`CommandError`] for this invocation.
    pub fn error(&self, cause: CommandFailure, output: Vec<u8>) -> CommandError {
        let (_, args) = self.argv();
        CommandError {
            cause,
            binary: self.binary.clone(),
            args,
            output,
        }
    }
}

impl Default for Invocation {
    fn default() -> Self {
        Self::from_config(&WireguardConfig::default())
    }
}

/// Why a command run failed.
#[derive(Debug)]
pub enum CommandFailure {
    /// The process could not be started.
    Spawn(std::io::Error),
    /// Waiting on the process failed.
    Wait(std::io::Error),
    /// The process exited unsuccessfully.
    Exit(ExitStatus),
    /// The process outlived its time bound and was killed.
    Timeout(Duration),
}

impl std::fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandFailure::Spawn(e) => write!(f, "failed to start: {}", e),
            CommandFailure::Wait(e) => write!(f, "failed to wait: {}", e),
            CommandFailure::Exit(status) => write!(f, "{}", status),
            CommandFailure::Timeout(t) => write!(f, "timed out after {:?}", t),
        }
    }
}

/// A failed command run.
///
/// `output` holds whatever stdout was captured before the failure, so callers
/// may attempt a best-effort parse.
#[derive(Debug)]
pub struct CommandError {
    pub cause: CommandFailure,
    pub binary: String,
    pub args: Vec<String>,
    pub output: Vec<u8>,
}

impl CommandError {
    /// Returns `true` if the process was killed for exceeding its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, CommandFailure::Timeout(_))
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error running wg: {} ({} {:?})",
            self.cause, self.binary, self.args
        )
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            CommandFailure::Spawn(e) | CommandFailure::Wait(e) => Some(e),
            _ => None,
        }
    }
}
