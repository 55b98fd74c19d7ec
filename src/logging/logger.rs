// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logger handles: per-facility front end over a shared Context

use super::caller::CallSite;
use super::context::Context;
use super::fields::{encode_extra, Fields};
use super::template::{Record, RenderError};
use super::Level;
use chrono::Utc;
use serde::Serialize;
use std::fmt::Display;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Frames between the code calling a logging method and the emitting call:
/// one for [`Logger::output`], one for the public method wrapping it.
///
/// Every public emitting method is `#[inline(never)]` so this holds in
/// optimized builds too.
pub const DEFAULT_CALL_DEPTH: usize = 2;

/// Errors returned by logging calls
#[derive(Error, Debug)]
pub enum LogError {
    /// The context's template needs a field this call did not supply
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write log record: {0}")]
    Write(#[from] io::Error),

    /// A Fatal-level record was emitted; the caller must stop what it is doing
    #[error(transparent)]
    Fatal(#[from] Fatal),
}

impl LogError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, LogError::Fatal(_))
    }
}

/// Signal produced by every Fatal-level emission
///
/// Carries the message that was logged. Propagate it to a boundary that can
/// translate it (an HTTP 500, a process exit), or call [`Fatal::abort`] to
/// unwind with it as the panic payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("fatal: {message}")]
#[must_use = "a fatal signal must be propagated or aborted"]
pub struct Fatal {
    message: String,
}

impl Fatal {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }

    /// Unwind the current thread with `self` as the panic payload
    pub fn abort(self) -> ! {
        std::panic::panic_any(self)
    }
}

struct State {
    facility: String,
    level: Level,
    buf: Vec<u8>,
    call_depth: usize,
}

/// Named logger bound to one [`Context`]
///
/// Each logger has its own threshold; `Level::Default` defers to the
/// context's. Emissions on one logger are serialized by its internal lock,
/// which also guards the reusable render buffer. Loggers sharing a context
/// may interleave whole records in any order.
pub struct Logger {
    context: Arc<Context>,
    state: Mutex<State>,
}

impl Logger {
    pub(crate) fn new(context: Arc<Context>, facility: &str, level: Level) -> Self {
        Self {
            context,
            state: Mutex::new(State {
                facility: facility.to_string(),
                level,
                buf: Vec::new(),
                call_depth: DEFAULT_CALL_DEPTH,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    pub fn set_level(&self, level: Level) {
        self.lock().level = level;
    }

    /// The logger's own level (possibly `Default`)
    pub fn level(&self) -> Level {
        self.lock().level
    }

    /// Subfacility name, rendered as `LogFacility` in extended records
    pub fn facility(&self) -> String {
        self.lock().facility.clone()
    }

    /// Number of frames to skip when resolving the caller of a logging call.
    ///
    /// Defaults to [`DEFAULT_CALL_DEPTH`]. Add one for each wrapper function
    /// placed between the code being reported and this logger.
    pub fn set_call_depth(&self, call_depth: usize) {
        self.lock().call_depth = call_depth;
    }

    pub fn call_depth(&self) -> usize {
        self.lock().call_depth
    }

    /// Whether a record at `level` passes the effective threshold
    pub fn check_level(&self, level: Level) -> bool {
        let own = self.level();
        let threshold = if own == Level::Default {
            self.context.level()
        } else {
            own
        };
        threshold >= level
    }

    /// Render and write one plain record, unconditionally.
    ///
    /// `call_depth` counts frames above this function: 1 reports the direct
    /// caller of `output`.
    #[inline(never)]
    pub fn output(
        &self,
        call_depth: usize,
        level: Level,
        trigger: &str,
        message: &str,
    ) -> Result<(), LogError> {
        let site = CallSite::capture(call_depth);
        self.emit(&site, level, trigger, message, None)
    }

    /// Like [`output`](Logger::output), but renders the extended record,
    /// supplying the facility and the serialized `fields`.
    #[inline(never)]
    pub fn output_with_fields<F>(
        &self,
        call_depth: usize,
        level: Level,
        trigger: &str,
        fields: Option<&F>,
        message: &str,
    ) -> Result<(), LogError>
    where
        F: Serialize + ?Sized,
    {
        let site = CallSite::capture(call_depth);
        let extra = encode_extra(fields);
        self.emit(&site, level, trigger, message, Some(&extra))
    }

    fn emit(
        &self,
        site: &CallSite,
        level: Level,
        trigger: &str,
        message: &str,
        extra: Option<&str>,
    ) -> Result<(), LogError> {
        let now = Utc::now();
        let mut guard = self.lock();
        let state = &mut *guard;

        let record = Record {
            now,
            level,
            trigger,
            function: &site.function,
            filename: &site.file,
            line: site.line,
            thread_id: std::process::id(),
            message,
            facility: extra.map(|_| state.facility.as_str()),
            extra,
        };

        state.buf.clear();
        if let Err(e) = self.context.template().render(&record, &mut state.buf) {
            state.buf.clear();
            return Err(e.into());
        }
        self.context.write_record(&state.buf)?;
        Ok(())
    }

    /// Log at an explicit level.
    ///
    /// `Level::Fatal` bypasses the threshold and always returns
    /// `Err(LogError::Fatal)`, even if writing the record failed.
    #[inline(never)]
    pub fn log(&self, level: Level, message: impl Display) -> Result<(), LogError> {
        if level != Level::Fatal && !self.check_level(level) {
            return Ok(());
        }
        let message = message.to_string();
        let written = self.output(self.call_depth(), level, "", &message);
        if level == Level::Fatal {
            return Err(Fatal::new(message).into());
        }
        written
    }

    /// Log at an explicit level with structured fields (extended record)
    #[inline(never)]
    pub fn log_with_fields(
        &self,
        level: Level,
        fields: Option<&Fields>,
        message: impl Display,
    ) -> Result<(), LogError> {
        if level != Level::Fatal && !self.check_level(level) {
            return Ok(());
        }
        let message = message.to_string();
        let written = self.output_with_fields(self.call_depth(), level, "", fields, &message);
        if level == Level::Fatal {
            return Err(Fatal::new(message).into());
        }
        written
    }

    #[inline(never)]
    pub fn error(&self, message: impl Display) -> Result<(), LogError> {
        if !self.check_level(Level::Error) {
            return Ok(());
        }
        self.output(self.call_depth(), Level::Error, "", &message.to_string())
    }

    #[inline(never)]
    pub fn warning(&self, message: impl Display) -> Result<(), LogError> {
        if !self.check_level(Level::Warning) {
            return Ok(());
        }
        self.output(self.call_depth(), Level::Warning, "", &message.to_string())
    }

    #[inline(never)]
    pub fn info(&self, message: impl Display) -> Result<(), LogError> {
        if !self.check_level(Level::Info) {
            return Ok(());
        }
        self.output(self.call_depth(), Level::Info, "", &message.to_string())
    }

    #[inline(never)]
    pub fn debug(&self, message: impl Display) -> Result<(), LogError> {
        if !self.check_level(Level::Debug) {
            return Ok(());
        }
        self.output(self.call_depth(), Level::Debug, "", &message.to_string())
    }

    #[inline(never)]
    pub fn trace(&self, message: impl Display) -> Result<(), LogError> {
        if !self.check_level(Level::Trace) {
            return Ok(());
        }
        self.output(self.call_depth(), Level::Trace, "", &message.to_string())
    }

    /// Emit at Fatal regardless of thresholds and return the fatal signal.
    ///
    /// A render or write failure does not suppress the signal.
    #[inline(never)]
    pub fn panic(&self, message: impl Display) -> Fatal {
        let message = message.to_string();
        let _ = self.output(self.call_depth(), Level::Fatal, "", &message);
        Fatal::new(message)
    }

    #[inline(never)]
    pub fn error_with_fields(
        &self,
        fields: Option<&Fields>,
        message: impl Display,
    ) -> Result<(), LogError> {
        if !self.check_level(Level::Error) {
            return Ok(());
        }
        let message = message.to_string();
        self.output_with_fields(self.call_depth(), Level::Error, "", fields, &message)
    }

    #[inline(never)]
    pub fn warning_with_fields(
        &self,
        fields: Option<&Fields>,
        message: impl Display,
    ) -> Result<(), LogError> {
        if !self.check_level(Level::Warning) {
            return Ok(());
        }
        let message = message.to_string();
        self.output_with_fields(self.call_depth(), Level::Warning, "", fields, &message)
    }

    #[inline(never)]
    pub fn info_with_fields(
        &self,
        fields: Option<&Fields>,
        message: impl Display,
    ) -> Result<(), LogError> {
        if !self.check_level(Level::Info) {
            return Ok(());
        }
        let message = message.to_string();
        self.output_with_fields(self.call_depth(), Level::Info, "", fields, &message)
    }

    #[inline(never)]
    pub fn debug_with_fields(
        &self,
        fields: Option<&Fields>,
        message: impl Display,
    ) -> Result<(), LogError> {
        if !self.check_level(Level::Debug) {
            return Ok(());
        }
        let message = message.to_string();
        self.output_with_fields(self.call_depth(), Level::Debug, "", fields, &message)
    }

    #[inline(never)]
    pub fn trace_with_fields(
        &self,
        fields: Option<&Fields>,
        message: impl Display,
    ) -> Result<(), LogError> {
        if !self.check_level(Level::Trace) {
            return Ok(());
        }
        let message = message.to_string();
        self.output_with_fields(self.call_depth(), Level::Trace, "", fields, &message)
    }

    /// Extended-record counterpart of [`panic`](Logger::panic); renders at Fatal
    #[inline(never)]
    pub fn panic_with_fields(&self, fields: Option<&Fields>, message: impl Display) -> Fatal {
        let message = message.to_string();
        let _ = self.output_with_fields(self.call_depth(), Level::Fatal, "", fields, &message);
        Fatal::new(message)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Logger")
            .field("facility", &state.facility)
            .field("level", &state.level)
            .field("call_depth", &state.call_depth)
            .field("context", &self.context)
            .finish()
    }
}
