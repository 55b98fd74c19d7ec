// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Deferred logger initialization.
//!
//! Components that want a named [`Logger`](super::Logger) when they load,
//! before the process has settled on its log destination and levels, register
//! a callback instead of building the logger directly:
//!
//! ```
//! use logcore::logging::{startup, Level, Logger};
//! use std::sync::OnceLock;
//!
//! static LOG: OnceLock<Logger> = OnceLock::new();
//!
//! startup::register_deferred(|defaults| {
//!     let _ = LOG.set(defaults.v1().get_logger("billing", Level::Debug));
//! });
//!
//! // Later, once, from the process entry point:
//! startup::initialize_all(&logcore::config::LoggingConfig::default()).unwrap();
//! assert!(LOG.get().is_some());
//! ```
//!
//! Every callback runs exactly once, against the final configuration.

use super::template::{DEFAULT_FORMAT, DEFAULT_V1_FORMAT};
use super::{Context, Level};
use crate::config::{ConfigError, LoggingConfig};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};

/// Callback waiting for logging to be configured
pub type DeferredInit = Box<dyn FnOnce(&Defaults) + Send>;

/// The process default contexts handed to deferred initializers
#[derive(Debug, Clone)]
pub struct Defaults {
    standard: Arc<Context>,
    v1: Arc<Context>,
}

impl Defaults {
    pub fn new(standard: Arc<Context>, v1: Arc<Context>) -> Self {
        Self { standard, v1 }
    }

    /// Pre-configuration defaults: both formats to stderr at Warning
    pub fn stderr() -> Self {
        let standard = Context::stderr(DEFAULT_FORMAT, Level::Warning)
            .expect("built-in default format compiles");
        let v1 = Context::stderr(DEFAULT_V1_FORMAT, Level::Warning)
            .expect("built-in V1 format compiles");
        Self::new(Arc::new(standard), Arc::new(v1))
    }

    pub fn from_config(config: &LoggingConfig) -> Result<Self, ConfigError> {
        let (standard, v1) = config.build_contexts()?;
        Ok(Self::new(Arc::new(standard), Arc::new(v1)))
    }

    /// Context using the plain text format
    pub fn standard(&self) -> &Arc<Context> {
        &self.standard
    }

    /// Context using the extended (JSON) format
    pub fn v1(&self) -> &Arc<Context> {
        &self.v1
    }
}

enum Phase {
    Collecting(Vec<DeferredInit>),
    Initialized,
}

/// Registry of deferred logger initializers
///
/// Starts out collecting callbacks. [`initialize_all`](Self::initialize_all)
/// configures the default contexts, switches to initialized for good and
/// drains the callbacks in registration order. Callbacks registered after that
/// run immediately.
///
/// Callbacks run while the coordinator's lock is held; they must not call
/// `register_deferred` or `initialize_all` on the same coordinator. If a
/// pending callback panics, the rest still run and the first panic is
/// re-raised from `initialize_all` after the coordinator is initialized.
pub struct Coordinator {
    phase: Mutex<Phase>,
    defaults: RwLock<Defaults>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::with_defaults(Defaults::stderr())
    }

    /// Start collecting with `defaults` in place until initialization
    pub fn with_defaults(defaults: Defaults) -> Self {
        Self {
            phase: Mutex::new(Phase::Collecting(Vec::new())),
            defaults: RwLock::new(defaults),
        }
    }

    fn lock_phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current default contexts
    pub fn defaults(&self) -> Defaults {
        self.defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_initialized(&self) -> bool {
        matches!(*self.lock_phase(), Phase::Initialized)
    }

    /// Number of callbacks waiting for initialization
    pub fn pending(&self) -> usize {
        match &*self.lock_phase() {
            Phase::Collecting(pending) => pending.len(),
            Phase::Initialized => 0,
        }
    }

    /// Queue `init` until initialization, or run it now if that already
    /// happened.
    pub fn register_deferred<F>(&self, init: F)
    where
        F: FnOnce(&Defaults) + Send + 'static,
    {
        let mut phase = self.lock_phase();
        match &mut *phase {
            Phase::Collecting(pending) => pending.push(Box::new(init)),
            Phase::Initialized => init(&self.defaults()),
        }
    }

    /// Configure the default contexts from `config` and run every pending
    /// callback. Does nothing if already initialized.
    pub fn initialize_all(&self, config: &LoggingConfig) -> Result<(), ConfigError> {
        self.initialize_with(|| Defaults::from_config(config))
    }

    /// Like [`initialize_all`](Self::initialize_all), with the default
    /// contexts produced by `configure`.
    ///
    /// `configure` is called at most once over the coordinator's life. If it
    /// fails the coordinator keeps collecting and the error is returned.
    pub fn initialize_with<C>(&self, configure: C) -> Result<(), ConfigError>
    where
        C: FnOnce() -> Result<Defaults, ConfigError>,
    {
        let mut phase = self.lock_phase();
        if matches!(*phase, Phase::Initialized) {
            return Ok(());
        }

        let defaults = configure()?;
        *self.defaults.write().unwrap_or_else(PoisonError::into_inner) = defaults.clone();

        let pending = match std::mem::replace(&mut *phase, Phase::Initialized) {
            Phase::Collecting(pending) => pending,
            Phase::Initialized => Vec::new(),
        };
        // A panicking callback does not starve the ones after it; the first
        // panic resumes once every callback has run and the lock is released.
        let mut first_panic = None;
        for init in pending {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| init(&defaults))) {
                first_panic.get_or_insert(payload);
            }
        }
        drop(phase);
        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }
        Ok(())
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: OnceLock<Coordinator> = OnceLock::new();

/// The process-wide coordinator
pub fn global() -> &'static Coordinator {
    GLOBAL.get_or_init(Coordinator::new)
}

/// Register with the process-wide coordinator
pub fn register_deferred<F>(init: F)
where
    F: FnOnce(&Defaults) + Send + 'static,
{
    global().register_deferred(init)
}

/// Initialize the process-wide coordinator
pub fn initialize_all(config: &LoggingConfig) -> Result<(), ConfigError> {
    global().initialize_all(config)
}

/// Process-wide plain text context
pub fn default_context() -> Arc<Context> {
    Arc::clone(global().defaults().standard())
}

/// Process-wide extended (JSON) context
pub fn default_v1_context() -> Arc<Context> {
    Arc::clone(global().defaults().v1())
}
