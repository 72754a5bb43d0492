//! Operations context for dependency injection

use officetpl_config::Config;
use officetpl_errors::{Error, OpsError};
use officetpl_events::{EventEmitter, EventSender};
use officetpl_platform::{PathResolver, RegistryStore};
use officetpl_types::ResolvedPaths;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Operations context providing access to the registry, configuration and event channel
pub struct OpsCtx {
    /// Registry backing path resolution and the recent-templates lists
    pub registry: Arc<dyn RegistryStore>,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// Run configuration
    pub config: Config,
    /// Folder the run was started from
    pub working_dir: PathBuf,
    env: Option<BTreeMap<String, String>>,
    home: Option<PathBuf>,
}

impl OpsCtx {
    // No public constructor - use OpsContextBuilder instead

    /// Environment lookup used by path resolution: the injected table when
    /// one was given, the process environment otherwise
    #[must_use]
    pub fn env_var(&self, key: &str) -> Option<String> {
        match &self.env {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        }
    }

    /// Resolve the Office folders for this run, config overrides applied
    #[must_use]
    pub fn resolve_paths(&self) -> ResolvedPaths {
        let mut resolver = PathResolver::new(self.registry.as_ref())
            .with_env(|key: &str| self.env_var(key))
            .with_overrides(self.config.paths.clone());
        if let Some(home) = &self.home {
            resolver = resolver.with_home(home.clone());
        }
        resolver.resolve(self)
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for operations context
pub struct OpsContextBuilder {
    registry: Option<Arc<dyn RegistryStore>>,
    tx: Option<EventSender>,
    config: Option<Config>,
    working_dir: Option<PathBuf>,
    env: Option<BTreeMap<String, String>>,
    home: Option<PathBuf>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: None,
            tx: None,
            config: None,
            working_dir: None,
            env: None,
            home: None,
        }
    }

    /// Set registry store
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<dyn RegistryStore>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the folder the run starts from; defaults to the current directory
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Replace the process environment seen by path resolution
    #[must_use]
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Set the home directory used as the last path fallback
    #[must_use]
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if the registry, event sender or configuration is
    /// missing, or if no working directory was given and the current one
    /// cannot be read.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let registry = self.registry.ok_or_else(|| OpsError::MissingComponent {
            component: "registry".to_string(),
        })?;

        let tx = self.tx.ok_or_else(|| OpsError::MissingComponent {
            component: "event_sender".to_string(),
        })?;

        let config = self.config.ok_or_else(|| OpsError::MissingComponent {
            component: "config".to_string(),
        })?;

        let working_dir = match self.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        Ok(OpsCtx {
            registry,
            tx,
            config,
            working_dir,
            env: self.env,
            home: self.home,
        })
    }
}

impl Default for OpsContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
