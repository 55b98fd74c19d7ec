//! Integration Tests: Process-wide Startup Coordinator
//!
//! This is the only test in this binary touching `startup::global()`, so the
//! coordinator starts out collecting.

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use logcore::logging::{startup, Level, Logger};
    use logcore::{Destination, LoggingConfig};
    use std::sync::{Mutex, OnceLock};

    static BILLING: OnceLock<Logger> = OnceLock::new();
    static SEARCH: OnceLock<Logger> = OnceLock::new();
    static LATE: OnceLock<Logger> = OnceLock::new();
    static ORDER: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

    #[test]
    fn test_register_then_initialize() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("app.log");

        startup::register_deferred(|defaults| {
            ORDER.lock().unwrap().push("billing");
            let _ = BILLING.set(defaults.v1().get_logger("billing", Level::Debug));
        });
        startup::register_deferred(|defaults| {
            ORDER.lock().unwrap().push("search");
            let _ = SEARCH.set(defaults.standard().get_logger("search", Level::Default));
        });

        assert!(!startup::global().is_initialized());
        assert_eq!(startup::global().pending(), 2);
        assert!(BILLING.get().is_none());

        let config = LoggingConfig {
            destination: Destination::File(path.clone()),
            level: Level::Info,
            ..LoggingConfig::default()
        };
        startup::initialize_all(&config)?;

        assert_eq!(*ORDER.lock().unwrap(), vec!["billing", "search"]);
        assert_eq!(startup::default_context().level(), Level::Info);
        assert_eq!(startup::default_v1_context().level(), Level::Trace);

        let billing = BILLING.get().unwrap();
        let search = SEARCH.get().unwrap();
        billing.info_with_fields(Some(&logcore::fields! { "invoice" => 17 }), "charged")?;
        search.debug("below the default threshold")?;
        search.warning("index stale")?;

        // Registered after initialization: runs right away, exactly once.
        startup::register_deferred(|defaults| {
            ORDER.lock().unwrap().push("late");
            let _ = LATE.set(defaults.standard().get_logger("late", Level::Default));
        });
        assert!(LATE.get().is_some());
        assert_eq!(*ORDER.lock().unwrap(), vec!["billing", "search", "late"]);

        // Second initialization is a no-op: the file context stays in place.
        startup::initialize_all(&LoggingConfig::default())?;
        assert_eq!(startup::default_context().level(), Level::Info);
        assert_eq!(ORDER.lock().unwrap().len(), 3);

        let contents = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let billing_line: serde_json::Value = serde_json::from_str(lines[0])?;
        assert_eq!(billing_line["logFacility"], "billing");
        assert_eq!(billing_line["extra"]["invoice"], 17);
        assert_eq!(billing_line["message"], "charged");

        assert!(lines[1].contains("[WARNING]"));
        assert!(lines[1].contains("]: index stale "));
        Ok(())
    }
}
