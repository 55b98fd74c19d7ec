// SPDX-License-Identifier: Apache-2.0 OR MIT
// Output context: sink, compiled template and shared threshold

use super::logger::Logger;
use super::sink::{LogSink, StderrSink};
use super::template::{CompileError, Template};
use super::Level;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared output configuration for a family of loggers
///
/// Loggers hold the context through an `Arc`; reconfiguring output means
/// building a new context and handing it to newly created loggers.
pub struct Context {
    sink: Mutex<Box<dyn LogSink>>,
    template: Template,
    /// Threshold used by loggers whose own level is `Default`
    level: AtomicU8,
}

impl Context {
    /// Create a context writing `format`-rendered records to `sink`
    pub fn new(sink: Box<dyn LogSink>, format: &str, level: Level) -> Result<Self, CompileError> {
        Ok(Self {
            sink: Mutex::new(sink),
            template: Template::compile(format)?,
            level: AtomicU8::new(level.as_u8()),
        })
    }

    /// Create a context writing to standard error
    pub fn stderr(format: &str, level: Level) -> Result<Self, CompileError> {
        Self::new(Box::new(StderrSink::new()), format, level)
    }

    pub fn set_level(&self, level: Level) {
        self.level.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Create a logger bound to this context
    pub fn get_logger(self: &Arc<Self>, subfacility: &str, level: Level) -> Logger {
        Logger::new(Arc::clone(self), subfacility, level)
    }

    /// Write one rendered record, then flush if the sink supports it.
    ///
    /// Flush failures are ignored; write failures are returned.
    pub fn write_record(&self, line: &[u8]) -> io::Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let result = sink.write_line(line);
        if let Some(flushable) = sink.as_flushable() {
            let _ = flushable.flush_now();
        }
        result
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("format", &self.template.source())
            .field("level", &self.level())
            .finish()
    }
}
