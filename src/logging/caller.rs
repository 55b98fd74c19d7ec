// SPDX-License-Identifier: Apache-2.0 OR MIT
// Caller metadata for emitted records

use std::path::Path;

const UNKNOWN: &str = "???";

/// Function, file and line of the code that issued a log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Fully qualified function path, without the symbol hash
    pub function: String,
    /// Basename of the source file
    pub file: String,
    pub line: u32,
}

const ANCHOR: &str = "CallSite::capture";

impl CallSite {
    /// Resolve the frame `depth` levels above the function calling `capture`.
    ///
    /// Depth 0 is the caller of `capture` itself (the emitting function),
    /// depth 1 is whoever called that, and so on. Inlined frames count as
    /// frames. Unresolvable frames yield `???` and line 0.
    ///
    /// Files and lines come from debug info. Optimized builds need at least
    /// `debug = "line-tables-only"` in their profile to report them; function
    /// names only need the symbol table.
    #[inline(never)]
    pub fn capture(depth: usize) -> Self {
        walk(ANCHOR, depth).0.unwrap_or_else(Self::unknown)
    }

    fn from_symbol(symbol: &backtrace::Symbol) -> Self {
        let function = symbol
            .name()
            .map(|name| format!("{:#}", name))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let file = symbol
            .filename()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNKNOWN.to_string());
        Self {
            function,
            file,
            line: symbol.lineno().unwrap_or(0),
        }
    }

    pub fn unknown() -> Self {
        Self {
            function: UNKNOWN.to_string(),
            file: UNKNOWN.to_string(),
            line: 0,
        }
    }
}

/// Walk the stack innermost first, resolving frames only until the symbol
/// `depth` slots past the first one named `...anchor` is found.
///
/// Returns the site and the number of symbols resolved.
fn walk(anchor: &str, depth: usize) -> (Option<CallSite>, usize) {
    let mut anchored = false;
    let mut remaining = depth;
    let mut resolved = 0;
    let mut found = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            resolved += 1;
            if !anchored {
                anchored = symbol
                    .name()
                    .map(|name| format!("{:#}", name).ends_with(anchor))
                    .unwrap_or(false);
            } else if remaining == 0 {
                found = Some(CallSite::from_symbol(symbol));
            } else {
                remaining -= 1;
            }
        });
        found.is_none()
    });

    (found, resolved)
}
