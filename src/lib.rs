// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Structured, level-filtered logging for concurrent services.
//!
//! - [`logging::Context`] owns a sink, a compiled record template and a
//!   shared threshold.
//! - [`logging::Logger`] is a named front end over a context with its own
//!   threshold and caller-depth setting.
//! - [`logging::startup`] lets components ask for a logger before the process
//!   has configured its output, and hands it over once it has.
//! - [`config`] reads the startup configuration from JSON5.

pub mod config;
#[macro_use]
pub mod logging;

pub use config::{ConfigError, Destination, LoggingConfig};
pub use logging::{Context, Fatal, Fields, Level, LogError, Logger};
