// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Logging configuration file types and parsing.
//!
//! JSON5 format, so files may carry comments and trailing commas:
//!
//! ```json5
//! {
//!     // Both contexts write here
//!     destination: { tee: ["stderr", { file: "logs/app.log" }] },
//!     level: "warning",
//!     v1_level: "trace",
//! }
//! ```

use crate::logging::{
    CompileError, Context, FileSink, Level, LogSink, StderrSink, StdoutSink, Template, TeeSink,
    DEFAULT_FORMAT, DEFAULT_V1_FORMAT,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where rendered records go
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    #[default]
    Stderr,
    Stdout,
    /// Append to a file, creating it if missing
    File(PathBuf),
    /// Write every record to each destination in order
    Tee(Vec<Destination>),
}

impl Destination {
    /// Open the sink this destination describes
    pub fn open(&self) -> Result<Box<dyn LogSink>, ConfigError> {
        Ok(match self {
            Destination::Stderr => Box::new(StderrSink::new()),
            Destination::Stdout => Box::new(StdoutSink::new()),
            Destination::File(path) => Box::new(
                FileSink::open(path)
                    .map_err(|e| ConfigError::SinkError(path.clone(), e.to_string()))?,
            ),
            Destination::Tee(members) => Box::new(TeeSink::new(
                members
                    .iter()
                    .map(Destination::open)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
        })
    }
}

/// Startup logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub destination: Destination,

    /// Template for the default context
    #[serde(default = "default_format")]
    pub format: String,

    /// Starting threshold of the default context
    #[serde(default = "default_level")]
    pub level: Level,

    /// Template for the extended (JSON) context
    #[serde(default = "default_v1_format")]
    pub v1_format: String,

    /// Starting threshold of the extended context
    #[serde(default = "default_v1_level")]
    pub v1_level: Level,
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_level() -> Level {
    Level::Warning
}

fn default_v1_format() -> String {
    DEFAULT_V1_FORMAT.to_string()
}

fn default_v1_level() -> Level {
    Level::Trace
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            destination: Destination::default(),
            format: default_format(),
            level: default_level(),
            v1_format: default_v1_format(),
            v1_level: default_v1_level(),
        }
    }
}

impl LoggingConfig {
    /// Load configuration from a JSON5 file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Check that both templates compile
    pub fn validate(&self) -> Result<(), ConfigError> {
        Template::compile(&self.format).map_err(|e| ConfigError::Template {
            which: "format",
            source: e,
        })?;
        Template::compile(&self.v1_format).map_err(|e| ConfigError::Template {
            which: "v1_format",
            source: e,
        })?;
        Ok(())
    }

    /// Build the default and extended contexts, each with its own sink
    pub fn build_contexts(&self) -> Result<(Context, Context), ConfigError> {
        self.validate()?;
        let standard = Context::new(self.destination.open()?, &self.format, self.level).map_err(
            |e| ConfigError::Template {
                which: "format",
                source: e,
            },
        )?;
        let v1 = Context::new(self.destination.open()?, &self.v1_format, self.v1_level)
            .map_err(|e| ConfigError::Template {
                which: "v1_format",
                source: e,
            })?;
        Ok((standard, v1))
    }
}

/// Configuration errors; all of them are fatal at startup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {1}", path = .0.display())]
    IoError(PathBuf, String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid {which} template: {source}")]
    Template {
        which: &'static str,
        source: CompileError,
    },

    #[error("failed to open log destination '{path}': {1}", path = .0.display())]
    SinkError(PathBuf, String),
}
