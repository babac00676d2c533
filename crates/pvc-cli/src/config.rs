//! Plugin configuration.
//!
//! Optional TOML file, by default at `<config dir>/kubectl-pvc/config.toml`:
//!
//! ```toml
//! namespace = "shop"
//! context = "prod"
//! attach_match = "exact"
//! request_timeout_secs = 10
//! ```
//!
//! Command-line flags override file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pvc_core::MatchPolicy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::Cli;
use crate::error::CliError;

/// Namespace used when neither flags, config nor kubeconfig name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Default per-request timeout against the API server.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum length of a namespace name.
const NAMESPACE_MAX_LENGTH: usize = 63;

/// Contents of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Namespace to use when `--namespace` is not given.
    pub namespace: Option<String>,
    /// Kubeconfig context to use when `--context` is not given.
    pub context: Option<String>,
    /// Attachment matching policy.
    pub attach_match: MatchPolicy,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            context: None,
            attach_match: MatchPolicy::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl PluginConfig {
    /// Default location of the configuration file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kubectl-pvc").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is read
    /// if present and defaults are used otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if a file that should be read cannot be read or is
    /// invalid.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CliError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), CliError> {
        if let Some(namespace) = &self.namespace {
            validate_namespace(namespace)?;
        }

        if self.context.as_deref().is_some_and(str::is_empty) {
            return Err(CliError::Config("context cannot be empty".to_string()));
        }

        if self.request_timeout_secs == 0 {
            return Err(CliError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_namespace(namespace: &str) -> Result<(), CliError> {
    if namespace.is_empty() {
        return Err(CliError::Config("namespace cannot be empty".to_string()));
    }

    if namespace.len() > NAMESPACE_MAX_LENGTH {
        return Err(CliError::Config(format!(
            "namespace cannot exceed {NAMESPACE_MAX_LENGTH} characters"
        )));
    }

    let valid_chars = namespace
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || namespace.starts_with('-') || namespace.ends_with('-') {
        return Err(CliError::Config(format!(
            "namespace '{namespace}' must consist of lowercase alphanumeric characters or '-', and start and end with an alphanumeric character"
        )));
    }

    Ok(())
}

/// Effective settings after merging flags over the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Namespace, if flags or config named one.
    pub namespace: Option<String>,
    /// Kubeconfig context.
    pub context: Option<String>,
    /// Attachment matching policy.
    pub attach_match: MatchPolicy,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Settings {
    /// Merge command-line flags over file configuration.
    pub fn resolve(cli: &Cli, config: PluginConfig) -> Self {
        Self {
            namespace: cli.namespace.clone().or(config.namespace),
            context: cli.context.clone().or(config.context),
            attach_match: cli.attach_match.map_or(config.attach_match, MatchPolicy::from),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Namespace to use, falling back to `fallback` when none was configured.
    #[must_use]
    pub fn namespace_or(&self, fallback: &str) -> String {
        self.namespace
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}
