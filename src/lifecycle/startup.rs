//! Startup orchestration.
//!
//! Order: environment file → bootstrap config file → open store → resolve
//! settings. Any failure is fatal; nothing is served until all succeed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::bootstrap::{BootstrapError, Bootstrapper, ConfigLocator, Template};
use crate::http::AppState;
use crate::settings::{SettingsError, SettingsFacade};
use crate::store::{ConfigManager, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    /// Use this config file instead of searching.
    pub config_path: Option<PathBuf>,
    /// Template copied on first run instead of the bundled one.
    pub template: Option<PathBuf>,
}

/// Seed the process environment from a `.env` file.
///
/// An explicitly named file must load; the implicit `./.env` is optional.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, dotenvy::Error> {
    match path {
        Some(path) => dotenvy::from_path(path).map(|()| Some(path.to_path_buf())),
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e),
        },
    }
}

/// Bootstrap the config file and build the shared state. Blocking.
pub fn initialize(options: &StartupOptions) -> Result<AppState, StartupError> {
    let template = options
        .template
        .clone()
        .map(Template::File)
        .unwrap_or_default();

    let path = Bootstrapper::new(ConfigLocator::from_environment()?)
        .with_path(options.config_path.clone())
        .with_template(template)
        .run()?;

    let store = Arc::new(ConfigManager::open(path)?);
    let settings = Arc::new(SettingsFacade::from_process_env(store)?);

    Ok(AppState::new(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_explicit_env_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doctor.env");
        fs::write(&path, "DOCTOR_CONFIG_STARTUP_TEST_VAR=from-env-file\n").unwrap();

        let loaded = load_env_file(Some(&path)).unwrap();
        assert_eq!(loaded, Some(path));
        assert_eq!(
            std::env::var("DOCTOR_CONFIG_STARTUP_TEST_VAR").unwrap(),
            "from-env-file"
        );
    }

    #[test]
    fn test_missing_explicit_env_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = load_env_file(Some(&dir.path().join("absent.env"))).unwrap_err();
        assert!(err.not_found());
    }
}
