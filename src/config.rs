// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::storage::{LoadMode, TaskFile};
use crate::store::{DEFAULT_MAX_TASKS, IdPolicy, StoreOptions};
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_max_tasks() -> usize {
    DEFAULT_MAX_TASKS
}

fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Overrides `<data_dir>/tasks.txt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_file: Option<PathBuf>,
    #[serde(default)]
    pub id_policy: IdPolicy,
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,
    /// Fail startup on a malformed record instead of skipping it.
    #[serde(default)]
    pub strict_load: bool,
    /// Attempts allowed per prompt in the interactive menu. Unset means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_prompt_attempts: Option<u32>,
    #[serde(default = "default_log_level")]
    pub log_level: log::LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            task_file: None,
            id_policy: IdPolicy::default(),
            max_tasks: DEFAULT_MAX_TASKS,
            strict_load: false,
            max_prompt_attempts: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(cfg) => Ok(cfg),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        TaskFile::atomic_write(&path, toml_str)?;
        Ok(())
    }

    /// The task file to use: `task_file` if set, else the context default.
    pub fn resolve_task_file(&self, ctx: &dyn AppContext) -> Result<PathBuf> {
        match &self.task_file {
            Some(p) => Ok(p.clone()),
            None => ctx.get_task_file_path(),
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            id_policy: self.id_policy,
            max_tasks: self.max_tasks,
            load_mode: LoadMode::from_strict(self.strict_load),
        }
    }
}
