use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SemtagError};

fn default_remote() -> String {
    "origin".to_string()
}

/// Runtime configuration for git-semtag.
///
/// Everything has a default; the tool works with no configuration file at
/// all.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Name of the push remote. The tool talks to exactly one remote per
    /// invocation; this only renames it.
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: default_remote(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitsemtag.toml` in the current directory
/// 3. `.gitsemtag.toml` in the user config directory
/// 4. Default configuration if no file is found
///
/// # Arguments
/// * `config_path` - Optional path to a custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitsemtag.toml").exists() {
        fs::read_to_string("./gitsemtag.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitsemtag.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| SemtagError::config(e.to_string()))
}
