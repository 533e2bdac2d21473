//! First-run bootstrap of the config file.
//!
//! # Data Flow
//! ```text
//! explicit path (--config / DOCTOR_CONFIG_PATH)?
//!     → yes: use it
//!     → no:  locator.rs walks the search path, first existing file wins
//! selected path has no file?
//!     → template.rs writes the default template there (parents created)
//! → path handed to ConfigManager::open
//! ```
//!
//! Runs once, synchronously, before the store's first load.

pub mod locator;
pub mod template;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use locator::ConfigLocator;
pub use template::Template;

/// Failure to produce a config file to load.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("default config template not found at {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("failed to create config directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write default config to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

/// Whether bootstrap found a file or had to create one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Existing,
    Created,
}

/// Selects the config path and guarantees a file exists there.
#[derive(Debug, Clone)]
pub struct Bootstrapper {
    locator: ConfigLocator,
    explicit: Option<PathBuf>,
    template: Template,
}

impl Bootstrapper {
    pub fn new(locator: ConfigLocator) -> Self {
        Self {
            locator,
            explicit: None,
            template: Template::Bundled,
        }
    }

    /// Skip the search and use this path.
    pub fn with_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    pub fn target(&self) -> PathBuf {
        self.explicit
            .clone()
            .unwrap_or_else(|| self.locator.locate())
    }

    /// Resolve the config path, writing the template there if needed.
    pub fn run(&self) -> Result<PathBuf, BootstrapError> {
        let path = self.target();
        ensure_config(&path, &self.template)?;
        Ok(path)
    }
}

/// Write `template` to `path` unless a file is already there.
pub fn ensure_config(path: &Path, template: &Template) -> Result<BootstrapOutcome, BootstrapError> {
    if locator::is_config_file(path) {
        return Ok(BootstrapOutcome::Existing);
    }
    template.check()?;

    tracing::info!(path = %path.display(), "No config file found, creating default config");
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| BootstrapError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    template.install(path)?;

    tracing::info!(path = %path.display(), "Created default config");
    Ok(BootstrapOutcome::Created)
}
