//! Runtime configuration service for the slow query doctor.
//!
//! A YAML config file addressed by dotted keys, bootstrapped from a bundled
//! template on first run, projected into typed settings with environment
//! overrides, and exposed over HTTP for reading and updating at runtime.

pub mod admin;
pub mod bootstrap;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod settings;
pub mod store;

pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
pub use settings::{Settings, SettingsFacade};
pub use store::ConfigManager;
