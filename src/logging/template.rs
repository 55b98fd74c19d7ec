// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Record templates.
//!
//! A template is literal text interleaved with actions. An action is either
//! `{{.Field}}` or `{{func .Field}}`:
//!
//! ```text
//! {{timeStamp .Now}}[{{.Level}}][NULL, {{.Function}}({{.Filename}}:{{.LineNo}})][{{.Trigger}}]: {{.Message}}
//! ```
//!
//! Templates are compiled once, when a [`Context`](super::Context) is built,
//! and rendered for every emitted record. The field set is closed: anything
//! outside [`Field`] is rejected at compile time.

use super::Level;
use chrono::{DateTime, Local, Utc};
use thiserror::Error;

/// Sentinel rendered for an empty trigger label and for absent extra fields
pub const NULL_STR: &str = "null";

/// Default single-line text format
pub const DEFAULT_FORMAT: &str = "{{timeStamp .Now}}[{{.Level}}][NULL, {{.Function}}({{.Filename}}:{{.LineNo}})][{{.Trigger}}]: {{.Message}} ";

/// Extended ("V1") format: one JSON object per line
pub const DEFAULT_V1_FORMAT: &str = concat!(
    r#"{"timestamp":"{{iso8601TimeStamp .Now}}","#,
    r#""triggerLabel":{{quote .TriggerLabel}},"#,
    r#""logLevel":"{{.Level}}","#,
    r#""logFacility":{{quote .LogFacility}},"#,
    r#""threadId":{{.ThreadId}},"#,
    r#""function":{{quote .Function}},"#,
    r#""file":{{quote .Filename}},"#,
    r#""lineNo":{{.LineNo}},"#,
    r#""message":{{quote .Message}},"#,
    r#""extra":{{.Extra}}}"#,
);

/// Errors raised while compiling a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("unterminated action starting at byte {0}")]
    Unterminated(usize),

    #[error("empty action at byte {0}")]
    EmptyAction(usize),

    #[error("malformed action `{{{{{action}}}}}`: expected `.Field` or `func .Field`")]
    Malformed { action: String },

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("function `{func}` cannot be applied to field `{field}`")]
    Mismatch { func: &'static str, field: &'static str },
}

/// Errors raised while rendering a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("template references field `{0}` which this record does not carry")]
    MissingField(&'static str),
}

/// Fields a template may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Now,
    Level,
    /// Also reachable as `.Trigger`
    TriggerLabel,
    Function,
    Filename,
    LineNo,
    ThreadId,
    Message,
    LogFacility,
    Extra,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Now" => Field::Now,
            "Level" => Field::Level,
            "Trigger" | "TriggerLabel" => Field::TriggerLabel,
            "Function" => Field::Function,
            "Filename" => Field::Filename,
            "LineNo" => Field::LineNo,
            "ThreadId" => Field::ThreadId,
            "Message" => Field::Message,
            "LogFacility" => Field::LogFacility,
            "Extra" => Field::Extra,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Field::Now => "Now",
            Field::Level => "Level",
            Field::TriggerLabel => "TriggerLabel",
            Field::Function => "Function",
            Field::Filename => "Filename",
            Field::LineNo => "LineNo",
            Field::ThreadId => "ThreadId",
            Field::Message => "Message",
            Field::LogFacility => "LogFacility",
            Field::Extra => "Extra",
        }
    }

    const fn is_text(self) -> bool {
        matches!(
            self,
            Field::Level
                | Field::TriggerLabel
                | Field::Function
                | Field::Filename
                | Field::Message
                | Field::LogFacility
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    TimeStamp,
    Iso8601TimeStamp,
    Quote,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "timeStamp" => Some(Func::TimeStamp),
            "iso8601TimeStamp" => Some(Func::Iso8601TimeStamp),
            "quote" => Some(Func::Quote),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Func::TimeStamp => "timeStamp",
            Func::Iso8601TimeStamp => "iso8601TimeStamp",
            Func::Quote => "quote",
        }
    }

    fn accepts(self, field: Field) -> bool {
        match self {
            Func::TimeStamp | Func::Iso8601TimeStamp => field == Field::Now,
            Func::Quote => field.is_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Action { func: Option<Func>, field: Field },
}

/// Values substituted into a template for one log line
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub now: DateTime<Utc>,
    pub level: Level,
    /// Empty renders as [`NULL_STR`]
    pub trigger: &'a str,
    pub function: &'a str,
    pub filename: &'a str,
    pub line: u32,
    pub thread_id: u32,
    pub message: &'a str,
    /// Only the extended emission path carries a facility
    pub facility: Option<&'a str>,
    /// Pre-serialized structured fields (or [`NULL_STR`]); extended path only
    pub extra: Option<&'a str>,
}

/// Compiled record template
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Compile a format string
    pub fn compile(source: &str) -> Result<Self, CompileError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let body_start = start + 2;
            let end = rest[body_start..]
                .find("}}")
                .ok_or(CompileError::Unterminated(offset + start))?;
            let action = rest[body_start..body_start + end].trim();
            segments.push(parse_action(action, offset + start)?);

            let consumed = body_start + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The format string this template was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether any action references `field`
    pub fn references(&self, field: Field) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Action { field: f, .. } if *f == field))
    }

    /// Render `record` onto the end of `out`.
    ///
    /// The rendered line always ends with exactly one `\n`. On error `out` may
    /// hold a partial line; callers clear it before reuse.
    pub fn render(&self, record: &Record<'_>, out: &mut Vec<u8>) -> Result<(), RenderError> {
        let start = out.len();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.extend_from_slice(text.as_bytes()),
                Segment::Action { func, field } => render_action(*func, *field, record, out)?,
            }
        }

        while out.len() > start && out.last() == Some(&b'\n') {
            out.pop();
        }
        out.push(b'\n');
        Ok(())
    }

    /// Render into a fresh string
    pub fn render_to_string(&self, record: &Record<'_>) -> Result<String, RenderError> {
        let mut out = Vec::new();
        self.render(record, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

fn parse_action(action: &str, at: usize) -> Result<Segment, CompileError> {
    let tokens: Vec<&str> = action.split_whitespace().collect();
    let (func, field_token) = match tokens.as_slice() {
        [] => return Err(CompileError::EmptyAction(at)),
        [field] => (None, *field),
        [func, field] => {
            let func = Func::from_name(func)
                .ok_or_else(|| CompileError::UnknownFunction(func.to_string()))?;
            (Some(func), *field)
        }
        _ => {
            return Err(CompileError::Malformed {
                action: action.to_string(),
            })
        }
    };

    let name = field_token
        .strip_prefix('.')
        .ok_or_else(|| CompileError::Malformed {
            action: action.to_string(),
        })?;
    let field =
        Field::from_name(name).ok_or_else(|| CompileError::UnknownField(name.to_string()))?;

    if let Some(func) = func {
        if !func.accepts(field) {
            return Err(CompileError::Mismatch {
                func: func.name(),
                field: field.name(),
            });
        }
    }
    Ok(Segment::Action { func, field })
}

fn render_action(
    func: Option<Func>,
    field: Field,
    record: &Record<'_>,
    out: &mut Vec<u8>,
) -> Result<(), RenderError> {
    let text: String = match (func, field) {
        (Some(Func::Iso8601TimeStamp), _) => iso8601_timestamp(&record.now),
        (Some(Func::TimeStamp), _) | (None, Field::Now) => timestamp(&record.now),
        (Some(Func::Quote), Field::TriggerLabel) if record.trigger.is_empty() => {
            NULL_STR.to_string()
        }
        (Some(Func::Quote), _) => quote(text_value(field, record)?),
        (None, Field::LineNo) => record.line.to_string(),
        (None, Field::ThreadId) => record.thread_id.to_string(),
        (None, Field::Extra) => record
            .extra
            .ok_or(RenderError::MissingField(Field::Extra.name()))?
            .to_string(),
        (None, _) => text_value(field, record)?.to_string(),
    };
    out.extend_from_slice(text.as_bytes());
    Ok(())
}

fn text_value<'a>(field: Field, record: &Record<'a>) -> Result<&'a str, RenderError> {
    Ok(match field {
        Field::Level => record.level.as_str(),
        Field::TriggerLabel if record.trigger.is_empty() => NULL_STR,
        Field::TriggerLabel => record.trigger,
        Field::Function => record.function,
        Field::Filename => record.filename,
        Field::Message => record.message,
        Field::LogFacility => record
            .facility
            .ok_or(RenderError::MissingField(Field::LogFacility.name()))?,
        // Non-text fields never reach here: compile rejects `quote` on them and
        // render_action formats them directly.
        other => return Err(RenderError::MissingField(other.name())),
    })
}

fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Local time, e.g. `2023-04-26 08:45:05.232118402 +0200`
pub fn timestamp(now: &DateTime<Utc>) -> String {
    now.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S%.9f %z")
        .to_string()
}

/// UTC with millisecond precision, e.g. `2023-04-26T08:45:05.232Z`
pub fn iso8601_timestamp(now: &DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
