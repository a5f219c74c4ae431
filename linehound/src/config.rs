use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_MAX_ENTRIES;

/// Configuration for a search session.
///
/// Values can come from three places, lowest precedence first: the global
/// `config.yaml` under the platform config directory, a local
/// `.linehound.yaml`, and an explicit file passed on the command line.
/// CLI flags override all of them via [`SessionConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Root directory searches start from.
    /// None means no root was configured; the CLI prompts for one.
    #[serde(default)]
    pub root_path: Option<PathBuf>,

    /// Maximum number of cached queries before the cache is wiped
    #[serde(default = "default_max_cache_entries")]
    pub max_cache_entries: usize,

    /// Number of worker threads for unit scans
    /// Defaults to the number of CPU cores
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_cache_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            max_cache_entries: default_max_cache_entries(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl SessionConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally layering a specific file on top
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("linehound/config.yaml")),
            // Local config
            Some(PathBuf::from(".linehound.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments over configuration file values
    pub fn merge_with_cli(mut self, cli_config: SessionConfig) -> Self {
        if cli_config.root_path.is_some() {
            self.root_path = cli_config.root_path;
        }
        if cli_config.max_cache_entries != default_max_cache_entries() {
            self.max_cache_entries = cli_config.max_cache_entries;
        }
        if cli_config.thread_count != default_thread_count() {
            self.thread_count = cli_config.thread_count;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
