//! Typed settings facade.
//!
//! # Data Flow
//! ```text
//! store.document() (one copy per resolve)
//!     → document::get_as("api.port", 8000)  ─┐
//! env var API_PORT (if set, wins)          ─┴→ Settings (immutable snapshot)
//!     → ArcSwap in SettingsFacade
//!     → readers: facade.current()
//!
//! facade.reload():
//!     store.reload() → re-resolve every field → atomic swap
//! ```
//!
//! # Design Decisions
//! - Read-only: updates go through the store, then an explicit reload
//! - A malformed environment value is an error, not a silent default
//! - Env lookups go through `EnvSource` so tests never touch process env

pub mod env;
pub mod facade;
pub mod schema;

use thiserror::Error;

use crate::store::StoreError;

pub use env::{EnvSource, ProcessEnv};
pub use facade::SettingsFacade;
pub use schema::Settings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("environment variable {var} has invalid value '{value}'")]
    InvalidEnv { var: String, value: String },
}
