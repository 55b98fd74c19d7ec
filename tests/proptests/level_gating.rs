//! Property-Based Tests: Level Gating and Level Names
//!
//! # Coverage
//!
//! - **Gating:** for every (threshold, message level) pair a logger writes
//!   exactly when the message is no more verbose than the threshold, except
//!   Fatal, which always writes.
//! - **Deferral:** a logger at `Default` gates exactly like one holding the
//!   context's level.
//! - **Names:** level names round-trip in any letter case; other strings map
//!   to `Default`.

#[cfg(test)]
mod tests {
    use logcore::logging::{Context, Level, MemorySink};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn any_level() -> impl Strategy<Value = Level> {
        prop::sample::select(Level::ALL.to_vec())
    }

    fn writes(context_level: Level, own_level: Level, message_level: Level) -> bool {
        let sink = MemorySink::new();
        let ctx = Arc::new(
            Context::new(Box::new(sink.clone()), "{{.Message}}", context_level).unwrap(),
        );
        let logger = ctx.get_logger("prop", own_level);
        let result = logger.log(message_level, "m");
        assert_eq!(result.is_err(), message_level == Level::Fatal);
        !sink.is_empty()
    }

    proptest! {
        #[test]
        fn gating_follows_threshold(threshold in any_level(), level in any_level()) {
            prop_assume!(threshold != Level::Default);
            let expected = level == Level::Fatal || level <= threshold;
            prop_assert_eq!(writes(Level::Warning, threshold, level), expected);
        }

        #[test]
        fn default_defers_to_context(context_level in any_level(), level in any_level()) {
            prop_assert_eq!(
                writes(context_level, Level::Default, level),
                level == Level::Fatal || level <= context_level
            );
        }

        #[test]
        fn names_round_trip_in_any_case(level in any_level(), upper in any::<bool>()) {
            let name = if upper {
                level.as_str().to_uppercase()
            } else {
                level.as_str().to_lowercase()
            };
            prop_assert_eq!(Level::from_name(&name), level);
        }

        #[test]
        fn unknown_names_are_default(name in "[a-z]{1,12}") {
            let known = ["default", "critical", "fatal", "error", "warning", "info", "debug", "trace"];
            prop_assume!(!known.contains(&name.as_str()));
            prop_assert_eq!(Level::from_name(&name), Level::Default);
        }
    }
}
