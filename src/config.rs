use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::ExerciseCatalog;
use crate::error::{ConfigError, InputError, Result, VitalisError};
use crate::fatigue::FatigueModel;
use crate::insights::{InsightEngine, DEFAULT_INSIGHT_LIMIT};
use crate::logging::LogConfig;
use crate::thresholds::Thresholds;

const CONFIG_VERSION: &str = "1.0";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Insight engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Rule thresholds, recovery penalties and fatigue windows
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Insight engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum insights returned per evaluation
    pub insight_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            insight_limit: DEFAULT_INSIGHT_LIMIT,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            metadata: ConfigMetadata {
                version: CONFIG_VERSION.to_string(),
                created_at: now,
                updated_at: now,
            },
            engine: EngineConfig::default(),
            thresholds: Thresholds::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            reason: e.to_string(),
        })?;
        fs::write(&path, toml_content)?;

        tracing::info!(path = %path.as_ref().display(), "Configuration saved");
        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vitalis")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "Using default configuration"
                );
                Self::default()
            }
        }
    }

    /// Load a file that is about to be modified
    ///
    /// Unlike [`load_or_default`](Self::load_or_default), only a missing file
    /// falls back to defaults. A file that fails to parse or validate is an
    /// error, so saving never clobbers settings that could not be read.
    pub fn load_for_update<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load_from_file(path) {
            Err(VitalisError::Input(InputError::FileNotFound { .. })) => Ok(Self::default()),
            other => other,
        }
    }

    /// Write a default configuration to a path that does not exist yet
    pub fn init_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            }
            .into());
        }

        let mut config = Self::default();
        config.save_to_file(path)?;
        Ok(config)
    }

    /// Reject configurations the engines cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.engine.insight_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.insight_limit".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        self.thresholds.validate()?;
        Ok(())
    }

    /// All settable keys with their current values, dotted
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let mut entries = Vec::new();
        flatten("", &self.as_toml()?, &mut entries);
        entries.retain(|(key, _)| !key.starts_with("metadata."));
        Ok(entries)
    }

    /// Read a single dotted key, e.g. `thresholds.nutrition.protein_low_ratio`
    pub fn get(&self, key: &str) -> Result<String> {
        let root = self.as_toml()?;
        lookup(&root, key)
            .map(render)
            .ok_or_else(|| unknown_key(key))
    }

    /// Update a single dotted key, keeping the existing value's type
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if key.starts_with("metadata.") {
            return Err(unknown_key(key));
        }

        let mut root = self.as_toml()?;
        let slot = lookup_mut(&mut root, key).ok_or_else(|| unknown_key(key))?;
        *slot = parse_like(slot, key, value)?;

        let updated: AppConfig = root.try_into().map_err(|e: toml::de::Error| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                value: format!("{} ({})", value, e),
            }
        })?;
        updated.validate()?;

        *self = updated;
        self.metadata.updated_at = Utc::now();
        Ok(())
    }

    /// Insight engine using this configuration's thresholds and limit
    pub fn insight_engine(&self) -> InsightEngine {
        InsightEngine::with_thresholds(self.thresholds.clone()).with_limit(self.engine.insight_limit)
    }

    /// Fatigue model over `catalog` using this configuration's windows
    pub fn fatigue_model(&self, catalog: ExerciseCatalog) -> FatigueModel {
        FatigueModel::with_windows(catalog, self.thresholds.fatigue.clone())
    }

    fn as_toml(&self) -> Result<toml::Value> {
        toml::Value::try_from(self).map_err(|e| {
            ConfigError::Serialize {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn unknown_key(key: &str) -> VitalisError {
    ConfigError::UnknownKey {
        key: key.to_string(),
    }
    .into()
}

fn lookup<'a>(root: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(root, |node, part| node.get(part))
}

fn lookup_mut<'a>(root: &'a mut toml::Value, key: &str) -> Option<&'a mut toml::Value> {
    let node = key.split('.').try_fold(root, |node, part| node.get_mut(part))?;
    if node.is_table() {
        None
    } else {
        Some(node)
    }
}

fn parse_like(existing: &toml::Value, key: &str, raw: &str) -> Result<toml::Value> {
    let invalid = || ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    };

    let parsed = match existing {
        toml::Value::Integer(_) => toml::Value::Integer(raw.trim().parse().map_err(|_| invalid())?),
        toml::Value::Float(_) => toml::Value::Float(raw.trim().parse().map_err(|_| invalid())?),
        toml::Value::Boolean(_) => toml::Value::Boolean(raw.trim().parse().map_err(|_| invalid())?),
        _ => toml::Value::String(raw.to_string()),
    };
    Ok(parsed)
}

fn render(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn flatten(prefix: &str, value: &toml::Value, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, child, out);
            }
        }
        leaf => out.push((prefix.to_string(), render(leaf))),
    }
}
