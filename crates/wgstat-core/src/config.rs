//! Collector configuration.
//!
//! The host agent owns loading configuration files; this module only defines
//! the settings the collector consumes, their defaults, and validation.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::collector::OutputFormat;
use crate::util::parse_duration;

/// Conventional install location of the `wg` control utility.
pub const DEFAULT_BINARY: &str = "/usr/bin/wg";

/// Default bound on a single `wg` invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Settings for the WireGuard collector.
///
/// Every field has a default, so an empty table deserializes to
/// [`WireguardConfig::default()`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WireguardConfig {
    /// Path or command name of the `wg` binary.
    pub binary: String,
    /// Upper bound on the `wg` run; the process is killed when it expires.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Run `wg` through `sudo`.
    pub use_sudo: bool,
    /// Which `wg` output format to request and parse.
    pub format: OutputFormat,
    /// Parse whatever output a failed invocation managed to produce before
    /// reporting the failure.
    pub parse_partial_output: bool,
}

impl Default for WireguardConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            timeout: DEFAULT_TIMEOUT,
            use_sudo: false,
            format: OutputFormat::default(),
            parse_partial_output: false,
        }
    }
}

impl WireguardConfig {
    /// Checks the invariants the invoker relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.binary.trim().is_empty() {
            return Err(ConfigError::EmptyBinary);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `binary` is empty or whitespace.
    EmptyBinary,
    /// `timeout` is zero.
    ZeroTimeout,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyBinary => write!(f, "binary must not be empty"),
            ConfigError::ZeroTimeout => write!(f, "timeout must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Accepts either a duration string (`"1s"`, `"500ms"`) or whole seconds.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
    }
}
