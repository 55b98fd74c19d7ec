//! Integration Tests: Record Formats and Destinations

#[cfg(test)]
mod tests {
    use super::super::tests::memory_logger;
    use anyhow::Result;
    use logcore::logging::{Level, LogError, DEFAULT_FORMAT, DEFAULT_V1_FORMAT};
    use logcore::{Destination, LoggingConfig};
    use std::sync::Arc;

    #[test]
    fn test_default_line_shape() -> Result<()> {
        let (logger, sink) = memory_logger(DEFAULT_FORMAT, Level::Info);
        logger.warning("disk at 91%")?;

        let line = sink.lines().remove(0);
        assert!(line.ends_with(" \n"));
        assert!(line.contains("[WARNING][NULL, "));
        assert!(line.contains("(formats.rs:"));
        assert!(line.contains("][null]: disk at 91% "));
        Ok(())
    }

    #[test]
    fn test_v1_line_is_json() -> Result<()> {
        let (logger, sink) = memory_logger(DEFAULT_V1_FORMAT, Level::Info);
        let fields = logcore::fields! { "count" => 3 };
        logger.info_with_fields(Some(&fields), "line with \"quotes\"\tand tabs")?;
        logger.error_with_fields(None, "no fields")?;

        let lines = sink.lines();
        let first: serde_json::Value = serde_json::from_str(lines[0].trim_end())?;
        assert_eq!(first["logLevel"], "INFO");
        assert_eq!(first["logFacility"], "integration");
        assert_eq!(first["file"], "formats.rs");
        assert_eq!(first["threadId"], std::process::id());
        assert_eq!(first["message"], "line with \"quotes\"\tand tabs");
        assert!(lines[0].contains(r#""extra":{"count":3}"#));

        let timestamp = first["timestamp"].as_str().unwrap();
        assert_eq!(timestamp.len(), "2023-04-26T08:45:05.232Z".len());
        assert!(timestamp.ends_with('Z'));

        assert!(lines[1].contains(r#""extra":null"#));
        Ok(())
    }

    #[test]
    fn test_fatal_translated_at_boundary() {
        // A request handler turning the fatal signal into a status code.
        fn handle(logger: &logcore::Logger, healthy: bool) -> Result<u16, LogError> {
            if !healthy {
                return Err(logger.panic("backend unavailable").into());
            }
            logger.info("served")?;
            Ok(200)
        }

        let (logger, sink) = memory_logger(DEFAULT_FORMAT, Level::Info);
        let status = match handle(&logger, false) {
            Ok(status) => status,
            Err(LogError::Fatal(fatal)) => {
                assert_eq!(fatal.message(), "backend unavailable");
                500
            }
            Err(other) => panic!("unexpected error: {}", other),
        };
        assert_eq!(status, 500);
        assert!(sink.lines()[0].contains("[CRITICAL]"));
        assert_eq!(handle(&logger, true).unwrap(), 200);
    }

    #[test]
    fn test_tee_destination_reaches_every_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.log");
        let b = dir.path().join("b.log");
        let config = LoggingConfig::parse(&format!(
            r#"{{
                destination: {{ tee: [ {{ file: "{}" }}, {{ file: "{}" }} ] }},
                format: "{{{{.Level}}}} {{{{.Message}}}}",
                level: "debug",
            }}"#,
            a.display(),
            b.display()
        ))?;

        let (standard, _v1) = config.build_contexts()?;
        let logger = Arc::new(standard).get_logger("tee", Level::Default);
        logger.debug("fan out")?;
        logger.trace("too verbose")?;

        assert_eq!(std::fs::read_to_string(&a)?, "DEBUG fan out\n");
        assert_eq!(std::fs::read_to_string(&b)?, "DEBUG fan out\n");
        Ok(())
    }

    #[test]
    fn test_stdout_destination_opens() -> Result<()> {
        let config = LoggingConfig {
            destination: Destination::Stdout,
            ..LoggingConfig::default()
        };
        let (standard, v1) = config.build_contexts()?;
        assert_eq!(standard.level(), Level::Warning);
        assert_eq!(v1.level(), Level::Trace);
        Ok(())
    }
}
