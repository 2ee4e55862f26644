use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub process: ProcessConfig,
    pub tags: TagsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Worker pool size for batch mode. Unset means one thread per
    /// available core (rayon default).
    pub threads: Option<usize>,
    /// Stop launching new batch units after the first failure instead of
    /// waiting for every unit to finish.
    pub stop_on_error: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Custom-field keys to remove in addition to the builtin Mora list.
    pub extra_strip_keys: Vec<String>,
}

impl Config {
    /// Load configuration from the given path or the default config location.
    ///
    /// A missing file yields the defaults, which reproduce the tool's stock
    /// behavior exactly.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|d| d.join("moraclean/config.toml")));

        let config = if let Some(ref p) = config_path {
            if p.exists() {
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?
            } else {
                Self::default()
            }
        } else {
            Self::default()
        };

        Ok(config)
    }
}
