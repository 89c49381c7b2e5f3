//! Holding and reloading the active configuration.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{Config, default_config};
use crate::error::{InkpageError, Result};
use crate::schema::ConfigValidator;

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".inkpage";

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the path to the default config file (`~/.inkpage/config.toml`).
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| InkpageError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Anything that holds the active configuration and can refresh it.
#[async_trait]
pub trait ConfigContainer: Send + Sync {
    /// The configuration currently in effect.
    fn config(&self) -> &Config;

    /// Reload the configuration from its source. On error the previous
    /// configuration stays in effect.
    async fn load_config(&mut self) -> Result<()>;
}

/// A [`ConfigContainer`] backed by a TOML or JSON file on disk.
#[derive(Debug)]
pub struct FileConfigContainer {
    path: PathBuf,
    config: Config,
    validator: ConfigValidator,
}

impl FileConfigContainer {
    /// Create a container for `path`. Nothing is read until
    /// [`ConfigContainer::load_config`] is called; until then the defaults
    /// are in effect.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            path: path.into(),
            config: default_config(),
            validator: ConfigValidator::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigContainer for FileConfigContainer {
    fn config(&self) -> &Config {
        &self.config
    }

    async fn load_config(&mut self) -> Result<()> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "config file not found, using defaults");
                self.config = default_config();
                return Ok(());
            }
            Err(e) => return Err(InkpageError::io(&self.path, e)),
        };

        let document = parse_document(&self.path, &content)?;
        self.validator.validate(&document)?;
        let config = merge_over_defaults(&default_config(), document)?;

        tracing::info!(
            path = ?self.path,
            index_page = config.index_page(),
            extra_keys = config.extra.len(),
            "loaded configuration"
        );
        self.config = config;
        Ok(())
    }
}

/// Parse a configuration document. `.toml` files are read as TOML,
/// everything else as JSON.
pub fn parse_document(path: &Path, content: &str) -> Result<Value> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(content).map_err(|e| {
            InkpageError::parse(format!("failed to parse {}: {e}", path.display()))
        })
    } else {
        serde_json::from_str(content).map_err(|e| {
            InkpageError::parse(format!("failed to parse {}: {e}", path.display()))
        })
    }
}

/// Overlay the top-level keys of `user` onto `defaults`. A `null` user value
/// counts as absent and keeps the default.
pub fn merge_over_defaults(defaults: &Config, user: Value) -> Result<Config> {
    let Value::Object(user) = user else {
        return Err(InkpageError::config("configuration must be a table of settings"));
    };

    let mut merged = match serde_json::to_value(defaults) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(InkpageError::config("default configuration is not a table")),
        Err(e) => return Err(InkpageError::config(e.to_string())),
    };

    for (key, value) in user {
        if value.is_null() {
            continue;
        }
        merged.insert(key, value);
    }

    serde_json::from_value(Value::Object(merged))
        .map_err(|e| InkpageError::config(format!("invalid configuration: {e}")))
}
