//! Config file search path.

use std::path::{Path, PathBuf};

use crate::bootstrap::BootstrapError;

/// Preferred file name, tried first in the working directory.
pub const PRIMARY_FILE_NAME: &str = ".slow-query-doctor.yml";

/// Fallback file name in the working directory.
pub const SECONDARY_FILE_NAME: &str = "config.yml";

/// System-wide location, tried last.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/slow-query-doctor/config.yml";

/// Resolves which config file to use.
///
/// Search order, first existing file wins:
/// 1. `./.slow-query-doctor.yml`
/// 2. `./config.yml`
/// 3. `~/.slow-query-doctor.yml`
/// 4. `/etc/slow-query-doctor/config.yml`
///
/// When none exist the first candidate is returned, so a default can be
/// written there.
#[derive(Debug, Clone)]
pub struct ConfigLocator {
    cwd: PathBuf,
    home: Option<PathBuf>,
    system: PathBuf,
}

impl ConfigLocator {
    pub fn new(cwd: impl Into<PathBuf>, home: Option<PathBuf>, system: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            home,
            system: system.into(),
        }
    }

    /// Locator rooted at the process working directory and the user's home.
    pub fn from_environment() -> Result<Self, BootstrapError> {
        let cwd = std::env::current_dir().map_err(BootstrapError::WorkingDir)?;
        let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        Ok(Self::new(cwd, home, SYSTEM_CONFIG_PATH))
    }

    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut paths = vec![
            self.cwd.join(PRIMARY_FILE_NAME),
            self.cwd.join(SECONDARY_FILE_NAME),
        ];
        if let Some(home) = &self.home {
            paths.push(home.join(PRIMARY_FILE_NAME));
        }
        paths.push(self.system.clone());
        paths
    }

    pub fn default_path(&self) -> PathBuf {
        self.cwd.join(PRIMARY_FILE_NAME)
    }

    pub fn locate(&self) -> PathBuf {
        self.candidates()
            .into_iter()
            .find(|path| is_config_file(path))
            .unwrap_or_else(|| self.default_path())
    }
}

/// Whether `path` holds a config file. Search and bootstrap both use this,
/// so a directory at a candidate path is never mistaken for one.
pub fn is_config_file(path: &Path) -> bool {
    path.is_file()
}
