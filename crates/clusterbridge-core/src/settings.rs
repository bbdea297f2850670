use std::path::Path;

use config as cfg;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{ClusterBridgeError, Result};

/// Prefix for layered environment overrides, e.g.
/// `CLUSTERBRIDGE__DEASSIGN__DISABLED=true`.
pub const ENV_PREFIX: &str = "CLUSTERBRIDGE";

/// Switch honoured by the clustering test harnesses to observe raw
/// clustering output. Any non-empty value disables deassignment.
pub const DISABLE_DEASSIGN_ENV: &str = "NGRAPH_TF_DISABLE_DEASSIGN_CLUSTERS";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Top-level configuration, resolved once at pipeline setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub deassign: DeassignConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeassignConfig {
    /// Skip the deassignment pass entirely.
    #[serde(default)]
    pub disabled: bool,
}

impl DeassignConfig {
    pub fn disabled() -> Self {
        Self { disabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "pretty", "compact", "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration with the following precedence (later wins):
    /// 1. Built-in defaults
    /// 2. The TOML file at `path`, if given
    /// 3. `CLUSTERBRIDGE__*` environment variables
    /// 4. The legacy `NGRAPH_TF_DISABLE_DEASSIGN_CLUSTERS` switch
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::load_from_sources(path, None)?;
        let config = Self::apply_env_overrides_with(config, |key| std::env::var(key).ok());
        config.validate()?;

        info!(
            deassign_disabled = config.deassign.disabled,
            log_level = %config.logging.level,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Layered file + environment load. `env` replaces the process
    /// environment when given.
    pub fn load_from_sources(
        path: Option<&Path>,
        env: Option<cfg::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = cfg::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ClusterBridgeError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            debug!("reading config file {}", path.display());
            builder = builder.add_source(
                cfg::File::from(path)
                    .format(cfg::FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            cfg::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: BridgeConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies the legacy disable switch. `lookup` resolves an environment
    /// variable name to its value.
    pub fn apply_env_overrides_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(DISABLE_DEASSIGN_ENV) {
            if !value.is_empty() {
                debug!("{} is set, disabling cluster deassignment", DISABLE_DEASSIGN_ENV);
                self.deassign.disabled = true;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ClusterBridgeError::Config(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ClusterBridgeError::Config(format!(
                "unknown log format '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BridgeConfig =
            toml::from_str(content).map_err(|e| ClusterBridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ClusterBridgeError::Config(e.to_string()))
    }
}
