// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logging macros: format-string front ends for Logger

/// Log at an explicit level with `format!`-style arguments
///
/// # Examples
/// ```ignore
/// log_at!(logger, Level::Warning, "queue depth {}", depth)?;
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format_args!($($arg)+))
    };
}

/// Log a message with error severity
///
/// # Examples
/// ```ignore
/// log_error!(logger, "failed to bind {}", addr)?;
/// ```
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(format_args!($($arg)+))
    };
}

/// Log a message with warning severity
#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warning(format_args!($($arg)+))
    };
}

/// Log a message with info severity
///
/// # Examples
/// ```ignore
/// log_info!(logger, "listening on {}", port)?;
/// ```
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format_args!($($arg)+))
    };
}

/// Log a message with debug severity
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(format_args!($($arg)+))
    };
}

/// Log a message with trace severity
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace(format_args!($($arg)+))
    };
}

/// Log at Fatal and evaluate to the [`Fatal`](crate::logging::Fatal) signal
///
/// # Examples
/// ```ignore
/// return Err(log_panic!(logger, "lost connection to {}", peer).into());
/// ```
#[macro_export]
macro_rules! log_panic {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panic(format_args!($($arg)+))
    };
}

/// Build a [`Fields`](crate::logging::Fields) map
///
/// Values that fail to serialize become `null`.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::logging::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::logging::Fields::new();
        $(
            fields.insert(
                ::std::string::ToString::to_string(&$key),
                $crate::logging::field_value(&$value),
            );
        )+
        fields
    }};
}

/// Log at an explicit level with structured fields and `format!`-style
/// arguments (extended record)
///
/// `fields` is an `Option<&Fields>`.
///
/// # Examples
/// ```ignore
/// log_at_fields!(logger, Level::Warning, Some(&fields), "retry {} of {}", n, max)?;
/// ```
#[macro_export]
macro_rules! log_at_fields {
    ($logger:expr, $level:expr, $fields:expr, $($arg:tt)+) => {
        $logger.log_with_fields($level, $fields, format_args!($($arg)+))
    };
}

/// Log with error severity and structured fields
#[macro_export]
macro_rules! log_error_fields {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $logger.error_with_fields($fields, format_args!($($arg)+))
    };
}

/// Log with warning severity and structured fields
#[macro_export]
macro_rules! log_warning_fields {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $logger.warning_with_fields($fields, format_args!($($arg)+))
    };
}

/// Log with info severity and structured fields
///
/// # Examples
/// ```ignore
/// log_info_fields!(logger, Some(&fields), "served {} in {}ms", route, ms)?;
/// ```
#[macro_export]
macro_rules! log_info_fields {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $logger.info_with_fields($fields, format_args!($($arg)+))
    };
}

/// Log with debug severity and structured fields
#[macro_export]
macro_rules! log_debug_fields {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $logger.debug_with_fields($fields, format_args!($($arg)+))
    };
}

/// Log with trace severity and structured fields
#[macro_export]
macro_rules! log_trace_fields {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $logger.trace_with_fields($fields, format_args!($($arg)+))
    };
}

/// Log at Fatal with structured fields and evaluate to the
/// [`Fatal`](crate::logging::Fatal) signal
#[macro_export]
macro_rules! log_panic_fields {
    ($logger:expr, $fields:expr, $($arg:tt)+) => {
        $logger.panic_with_fields($fields, format_args!($($arg)+))
    };
}

/// Log a message with structured fields (extended record)
///
/// # Examples
/// ```ignore
/// log_kv!(logger, Level::Info, "request served", "status" => 200, "route" => "/")?;
/// ```
#[macro_export]
macro_rules! log_kv {
    ($logger:expr, $level:expr, $msg:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let fields = $crate::fields! { $($key => $value),+ };
        $logger.log_with_fields($level, Some(&fields), $msg)
    }};
}
