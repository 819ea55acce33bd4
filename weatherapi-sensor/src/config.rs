use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, fs, path::Path, path::PathBuf};

/// Credentials and location for one sensor instance.
///
/// Neither field is validated: an empty or malformed value is passed to the
/// upstream as-is and surfaces as an error reading at call time.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(default)]
    pub api_key: String,

    /// Any location string the upstream `q` parameter accepts.
    #[serde(default)]
    pub zipcode: String,
}

impl fmt::Debug for SensorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("SensorConfig")
            .field("api_key", &api_key)
            .field("zipcode", &self.zipcode)
            .finish()
    }
}

impl SensorConfig {
    pub fn new(api_key: impl Into<String>, zipcode: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), zipcode: zipcode.into() }
    }

    /// Pull `api_key` and `zipcode` out of a host attribute bag.
    ///
    /// Missing or non-string attributes read as empty strings.
    pub fn from_attributes(attributes: &Map<String, Value>) -> Self {
        let field = |name: &str| {
            attributes.get(name).and_then(Value::as_str).unwrap_or_default().to_string()
        };

        Self { api_key: field("api_key"), zipcode: field("zipcode") }
    }

    /// Replace fields for which an override was given.
    pub fn with_overrides(mut self, api_key: Option<String>, zipcode: Option<String>) -> Self {
        if let Some(api_key) = api_key {
            self.api_key = api_key;
        }
        if let Some(zipcode) = zipcode {
            self.zipcode = zipcode;
        }
        self
    }

    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.zipcode.is_empty()
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: SensorConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded sensor config");
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "viam-labs", "weatherapi-sensor")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// What a host hands to a component constructor: the resource name and its
/// free-form attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub name: String,

    /// Model triple the host resolved this component to, e.g.
    /// `viam-labs:weather-api:current`.
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ComponentConfig {
    pub fn sensor_config(&self) -> SensorConfig {
        SensorConfig::from_attributes(&self.attributes)
    }

    /// Read a component config from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read component config: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse component config: {}", path.display()))
    }
}
