/*! Application context abstraction for filesystem paths.

`AppContext` decides where ptrack keeps its configuration, its task file and
its log. Two implementations:

- `StandardContext`: `directories::ProjectDirs`, or an override root given
  with `--root` (then `<root>/config` and `<root>/data`).
- `TestContext`: a unique temporary directory, removed on drop.

Code that touches the filesystem takes a `&dyn AppContext`; there is no
environment-variable or global lookup.
*/

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const TASK_FILE_NAME: &str = "tasks.txt";
pub const LOG_FILE_NAME: &str = "ptrack.log";

pub trait AppContext: std::fmt::Debug {
    fn get_data_dir(&self) -> Result<PathBuf>;
    fn get_config_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("config.toml"))
    }

    fn get_task_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_data_dir()?.join(TASK_FILE_NAME))
    }

    fn get_log_path(&self) -> Option<PathBuf> {
        self.get_data_dir().ok().map(|p| p.join(LOG_FILE_NAME))
    }
}

// Real user directories.

#[derive(Clone, Debug)]
pub struct StandardContext {
    override_root: Option<PathBuf>,
}

impl StandardContext {
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self { override_root }
    }

    fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create ptrack directory '{}'", dir.display()))?;
        Ok(dir)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("org", "ptrack", "ptrack")
            .ok_or_else(|| anyhow::anyhow!("Cannot locate a home directory for ptrack"))
    }
}

impl AppContext for StandardContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        let dir = match &self.override_root {
            Some(root) => root.join("data"),
            None => Self::project_dirs()?.data_dir().to_path_buf(),
        };
        Self::ensure_dir(dir)
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        let dir = match &self.override_root {
            Some(root) => root.join("config"),
            None => Self::project_dirs()?.config_dir().to_path_buf(),
        };
        Self::ensure_dir(dir)
    }
}

// Throwaway directory for tests.

#[derive(Clone, Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    /// Each context gets its own `ptrack_test_<uuid>` directory.
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("ptrack_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        let p = self.root.join("data");
        std::fs::create_dir_all(&p)?;
        Ok(p)
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        let p = self.root.join("config");
        std::fs::create_dir_all(&p)?;
        Ok(p)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Leftovers in the temp dir are harmless if removal fails.
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
