//! Where the CLI keeps its configuration, session cookies and log

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Config and data directories, platform defaults or a single override root
pub enum StateDir {
    Platform(Option<ProjectDirs>),
    /// `--state-dir` / `JOBLLAMA_STATE_DIR`; `config/` and `data/` live under it
    Override(PathBuf),
}

impl StateDir {
    pub fn new() -> Self {
        let project_dirs = ProjectDirs::from("ai", "JobLlama", "jobllama");
        if project_dirs.is_none() {
            warn!("No home directory found, keeping state in the working directory");
        }
        Self::Platform(project_dirs)
    }

    pub fn with_override(path: impl Into<PathBuf>) -> Self {
        Self::Override(path.into())
    }

    fn resolve(&self, leaf: &str, pick: fn(&ProjectDirs) -> &Path) -> PathBuf {
        match self {
            Self::Override(root) => root.join(leaf),
            Self::Platform(Some(dirs)) => pick(dirs).to_path_buf(),
            Self::Platform(None) => Path::new(".").join(leaf),
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.resolve("config", ProjectDirs::config_dir)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.resolve("data", ProjectDirs::data_dir)
    }

    /// Default configuration file
    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("jobllama.toml")
    }

    /// Default cookie file holding the session tokens
    pub fn cookie_path(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("jobllama.log")
    }

    pub async fn create_directories(&self) -> Result<()> {
        for dir in [self.config_dir(), self.data_dir()] {
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            debug!(dir = %dir.display(), "State directory ready");
        }
        Ok(())
    }
}

impl Default for StateDir {
    fn default() -> Self {
        Self::new()
    }
}
