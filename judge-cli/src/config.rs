//! Application configuration, loaded from a YAML file. A plain, explicitly-threaded struct — not
//! process-wide global state.
//!

use std::path::PathBuf;

use crate::{Result, ResultExt};

fn default_comparator() -> String {
    "default".to_owned()
}

fn default_time_limit_secs() -> f64 {
    1.0
}

fn default_memory_limit_mb() -> u64 {
    256
}

fn default_catalog_dir() -> PathBuf {
    PathBuf::from("exercises")
}

/// Top-level application configuration.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct AppConfig {
    /// Directory holding the paired `.json`/`.txt` exercise catalog.
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,

    /// Comparator name used when an exercise specification omits one.
    #[serde(default = "default_comparator")]
    pub default_comparator: String,

    /// CPU time limit, in seconds, used when an exercise specification omits one.
    #[serde(default = "default_time_limit_secs")]
    pub default_time_limit_secs: f64,

    /// Memory limit, in mebibytes, used when an exercise specification omits one.
    #[serde(default = "default_memory_limit_mb")]
    pub default_memory_limit_mb: u64,
}

impl Default for AppConfig {
    fn default() -> AppConfig {
        AppConfig {
            catalog_dir: default_catalog_dir(),
            default_comparator: default_comparator(),
            default_time_limit_secs: default_time_limit_secs(),
            default_memory_limit_mb: default_memory_limit_mb(),
        }
    }
}

/// Load an `AppConfig` from the YAML file at `path`.
pub fn load(path: &std::path::Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .chain_err(|| format!("failed to read configuration file \"{}\"", path.display()))?;
    serde_yaml::from_str(&contents)
        .chain_err(|| format!("failed to parse configuration file \"{}\"", path.display()))
}
