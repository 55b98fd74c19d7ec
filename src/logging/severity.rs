// SPDX-License-Identifier: Apache-2.0 OR MIT
// Severity levels, ordered by verbosity

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Log severity levels (0-6, higher is more verbose)
///
/// `Default` is not a real severity: a logger holding it defers to the
/// threshold of the context it was created from.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Level {
    /// Defer to the owning context's threshold
    Default = 0,
    /// Unrecoverable condition; emitting at this level aborts the caller
    Fatal = 1,
    /// Error conditions
    Error = 2,
    /// Warning conditions
    Warning = 3,
    /// Informational
    Info = 4,
    /// Debug-level messages
    Debug = 5,
    /// Very verbose tracing
    Trace = 6,
}

impl Level {
    /// Alias used in rendered output for `Fatal`
    pub const CRITICAL: Level = Level::Fatal;

    /// Every level, least verbose first
    pub const ALL: [Level; 7] = [
        Level::Default,
        Level::Fatal,
        Level::Error,
        Level::Warning,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Level name as rendered into records
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Default => "Default",
            Level::Fatal => "CRITICAL",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    /// Parse a level name, ignoring case. Unknown names map to `Default`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "critical" | "fatal" => Level::Fatal,
            "error" => Level::Error,
            "warning" => Level::Warning,
            "info" => Level::Info,
            "debug" => Level::Debug,
            "trace" => Level::Trace,
            _ => Level::Default,
        }
    }

    /// Create from u8 value (out of range values map to `Default`)
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Level::Fatal,
            2 => Level::Error,
            3 => Level::Warning,
            4 => Level::Info,
            5 => Level::Debug,
            6 => Level::Trace,
            _ => Level::Default,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Level::from_name(s))
    }
}

impl From<String> for Level {
    fn from(name: String) -> Self {
        Level::from_name(&name)
    }
}

impl From<Level> for &'static str {
    fn from(level: Level) -> Self {
        level.as_str()
    }
}
