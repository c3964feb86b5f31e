//! Configuration management for `dectest`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`DECTEST_*`)
//! 3. YAML config (`--config PATH`, else `./dectest.yaml`)
//! 4. Defaults
//!
//! Keys are normalized so that `internal_precision`, `internal-precision`
//! and `INTERNAL_PRECISION` name the same setting.

use crate::dialect::{DEFAULT_INTERNAL_PRECISION, Dialect, RoundingDirective};
use crate::error::{HarnessError, Result};
use crate::model::RoundingMode;
use crate::session::Session;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "dectest.yaml";

/// Prefix of environment variables read into the env layer.
pub const ENV_PREFIX: &str = "DECTEST_";

const KEY_DIALECT: &str = "dialect";
const KEY_INTERNAL_PRECISION: &str = "internal-precision";
const KEY_PRECISION: &str = "precision";
const KEY_ROUNDING: &str = "rounding";

/// Every key the harness understands.
pub const KNOWN_KEYS: &[&str] = &[KEY_DIALECT, KEY_INTERNAL_PRECISION, KEY_PRECISION, KEY_ROUNDING];

/// One source of configuration values, keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "Loading config file");
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Build a layer from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not YAML or is not a mapping.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
        let mut layer = Self::default();
        match value {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Mapping(map) => {
                for (key, value) in &map {
                    let Some(key) = key.as_str() else {
                        continue;
                    };
                    if let Some(value) = yaml_scalar_to_string(value) {
                        layer.insert(key, value);
                    }
                }
            }
            _ => {
                return Err(HarnessError::Config(
                    "config file must be a mapping of keys to values".to_string(),
                ));
            }
        }
        Ok(layer)
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    /// Build a layer from `(name, value)` pairs, keeping `DECTEST_*` names.
    #[must_use]
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layer.insert(stripped, value);
            }
        }
        layer
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dialect: Option<Dialect>,
    pub internal_precision: Option<u32>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();
        if let Some(dialect) = self.dialect {
            layer.insert(KEY_DIALECT, dialect.as_str());
        }
        if let Some(precision) = self.internal_precision {
            layer.insert(KEY_INTERNAL_PRECISION, precision.to_string());
        }
        layer
    }
}

/// Built-in defaults.
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.insert(KEY_DIALECT, Dialect::default().as_str());
    layer.insert(KEY_INTERNAL_PRECISION, DEFAULT_INTERNAL_PRECISION.to_string());
    layer.insert(KEY_PRECISION, "0");
    layer.insert(KEY_ROUNDING, RoundingMode::default().as_str());
    layer
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub dialect: Dialect,
    pub internal_precision: u32,
    /// Session precision before the first `precision:` directive.
    pub precision: u32,
    /// Session rounding before the first `rounding:` directive.
    pub rounding: RoundingMode,
    pub rounding_token: String,
}

impl HarnessConfig {
    /// Resolve a merged layer into typed settings.
    ///
    /// # Errors
    ///
    /// Returns `Config` for a missing or invalid value.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        for key in layer.values.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!(key = %key, "Ignoring unknown config key");
            }
        }

        let dialect: Dialect = require(layer, KEY_DIALECT)?.parse()?;
        let internal_precision = parse_u32(layer, KEY_INTERNAL_PRECISION)?;
        if internal_precision == 0 {
            return Err(HarnessError::Config(
                "internal-precision must be at least 1".to_string(),
            ));
        }
        let precision = parse_u32(layer, KEY_PRECISION)?;

        let token = require(layer, KEY_ROUNDING)?.trim().to_lowercase();
        let Some(RoundingDirective::Mode(rounding)) = dialect.rounding(&token) else {
            return Err(HarnessError::Config(format!(
                "rounding '{token}' is not supported by the engine under the {dialect} dialect"
            )));
        };

        Ok(Self {
            dialect,
            internal_precision,
            precision,
            rounding,
            rounding_token: token,
        })
    }

    /// Session state the run starts from.
    #[must_use]
    pub fn session(&self) -> Session {
        let mut session = Session::new(self.precision, self.rounding);
        session.set_rounding(&self.rounding_token, RoundingDirective::Mode(self.rounding));
        session
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            internal_precision: DEFAULT_INTERNAL_PRECISION,
            precision: 0,
            rounding: RoundingMode::default(),
            rounding_token: RoundingMode::default().as_str().to_string(),
        }
    }
}

/// Load configuration from every layer.
///
/// An explicit `config_path` must exist; the default file is optional.
///
/// # Errors
///
/// Returns an error if a config file cannot be read or parsed, or if the
/// merged values are invalid.
pub fn load_config(config_path: Option<&Path>, cli: &CliOverrides) -> Result<HarnessConfig> {
    let yaml = match config_path {
        Some(path) if !path.exists() => {
            return Err(HarnessError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Some(path) => ConfigLayer::from_yaml(path)?,
        None => ConfigLayer::from_yaml(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let merged = ConfigLayer::merge_layers(&[
        default_config_layer(),
        yaml,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]);
    let config = HarnessConfig::from_layer(&merged)?;
    debug!(?config, "Resolved configuration");
    Ok(config)
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn require<'a>(layer: &'a ConfigLayer, key: &str) -> Result<&'a str> {
    layer
        .get(key)
        .ok_or_else(|| HarnessError::Config(format!("missing config value '{key}'")))
}

fn parse_u32(layer: &ConfigLayer, key: &str) -> Result<u32> {
    let value = require(layer, key)?;
    value.trim().parse::<u32>().map_err(|_| {
        HarnessError::Config(format!(
            "'{key}' must be a non-negative integer, got '{value}'"
        ))
    })
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
