// Template-driven, level-filtered logging
//
// Severity -> Template -> Context -> Logger, with startup::Coordinator
// handing out loggers once the process has configured its output.

mod caller;
mod context;
mod fields;
mod logger;
#[macro_use]
mod macros;
mod severity;
mod sink;
pub mod startup;
mod template;

// Public exports
pub use caller::CallSite;
pub use context::Context;
pub use fields::{encode_extra, field_value, Fields};
pub use logger::{Fatal, LogError, Logger, DEFAULT_CALL_DEPTH};
pub use severity::Level;
pub use sink::{FileSink, Flushable, LogSink, MemorySink, StderrSink, StdoutSink, TeeSink};
pub use startup::{Coordinator, DeferredInit, Defaults};
pub use template::{
    iso8601_timestamp, timestamp, CompileError, Field, Record, RenderError, Template,
    DEFAULT_FORMAT, DEFAULT_V1_FORMAT, NULL_STR,
};
