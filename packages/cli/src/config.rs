use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use texpad_editor::SyncOptions;

pub const DEFAULT_CONFIG_NAME: &str = "texpad.config.json";

/// Texpad configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// File name suffixes handled by the markup codec; everything else is plain text
    #[serde(default = "default_markup_extensions")]
    pub markup_extensions: Vec<String>,

    /// Where the attribute pool is kept between runs
    #[serde(default = "default_pool_file")]
    pub pool_file: String,

    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_markup_extensions() -> Vec<String> {
    SyncOptions::default().markup_extensions
}

fn default_pool_file() -> String {
    "apool.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the pool file
    pub fn get_pool_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.pool_file)
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            markup_extensions: self.markup_extensions.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markup_extensions: default_markup_extensions(),
            pool_file: default_pool_file(),
            log_level: default_log_level(),
        }
    }
}
