//! Read-only settings view with explicit reload.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::observability::metrics;
use crate::settings::env::{EnvSource, ProcessEnv};
use crate::settings::schema::Settings;
use crate::settings::SettingsError;
use crate::store::ConfigManager;

/// Typed settings resolved once from the store.
///
/// Fields are not reactive: after a `set` + `save` on the store, or an
/// edit to the file on disk, callers see the old values until
/// [`reload`](Self::reload) runs.
pub struct SettingsFacade {
    store: Arc<ConfigManager>,
    env: Arc<dyn EnvSource>,
    current: ArcSwap<Settings>,
}

impl SettingsFacade {
    pub fn new(store: Arc<ConfigManager>, env: Arc<dyn EnvSource>) -> Result<Self, SettingsError> {
        let settings = Settings::resolve(&store, env.as_ref())?;
        Ok(Self {
            store,
            env,
            current: ArcSwap::from_pointee(settings),
        })
    }

    /// Facade overridden by the process environment.
    pub fn from_process_env(store: Arc<ConfigManager>) -> Result<Self, SettingsError> {
        Self::new(store, Arc::new(ProcessEnv))
    }

    /// Current snapshot. Cheap; never blocks on a reload in progress.
    pub fn current(&self) -> Arc<Settings> {
        self.current.load_full()
    }

    pub fn store(&self) -> &Arc<ConfigManager> {
        &self.store
    }

    /// Re-read the config file and re-resolve every field.
    ///
    /// Blocking. On failure the previous snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<Settings>, SettingsError> {
        let result = self
            .store
            .reload()
            .map_err(SettingsError::from)
            .and_then(|()| Settings::resolve(&self.store, self.env.as_ref()));

        match result {
            Ok(settings) => {
                let settings = Arc::new(settings);
                self.current.store(Arc::clone(&settings));
                metrics::record_reload(true);
                tracing::info!("Settings reloaded");
                Ok(settings)
            }
            Err(e) => {
                metrics::record_reload(false);
                tracing::error!(error = %e, "Settings reload failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn facade_with(content: &str, env: &[(&str, &str)]) -> (TempDir, SettingsFacade) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, content).unwrap();
        let store = Arc::new(ConfigManager::open(&path).unwrap());
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let facade = SettingsFacade::new(store, Arc::new(env)).unwrap();
        (dir, facade)
    }

    #[test]
    fn test_stale_until_reload() {
        let (_dir, facade) = facade_with("api:\n  port: 8000\n", &[]);
        assert_eq!(facade.current().api_port, 8000);

        facade.store().set("api.port", Value::from(8100)).unwrap();
        facade.store().save().unwrap();
        assert_eq!(facade.current().api_port, 8000);

        facade.reload().unwrap();
        assert_eq!(facade.current().api_port, 8100);
    }

    #[test]
    fn test_reload_picks_up_file_edits() {
        let (_dir, facade) = facade_with("llm:\n  ollama:\n    model: a\n", &[]);
        fs::write(facade.store().path(), "llm:\n  ollama:\n    model: b\n").unwrap();
        assert_eq!(facade.current().ollama_model, "a");

        let reloaded = facade.reload().unwrap();
        assert_eq!(reloaded.ollama_model, "b");
        assert_eq!(facade.current().ollama_model, "b");
    }

    #[test]
    fn test_failed_reload_keeps_snapshot() {
        let (_dir, facade) = facade_with("api:\n  port: 8000\n", &[]);
        fs::write(facade.store().path(), "api: [oops\n").unwrap();

        assert!(matches!(facade.reload(), Err(SettingsError::Store(_))));
        assert_eq!(facade.current().api_port, 8000);
    }

    #[test]
    fn test_env_still_wins_after_reload() {
        let (_dir, facade) = facade_with("api:\n  host: a\n", &[("API_HOST", "127.0.0.1")]);
        fs::write(facade.store().path(), "api:\n  host: b\n").unwrap();
        facade.reload().unwrap();
        assert_eq!(facade.current().api_host, "127.0.0.1");
    }
}
