//! Configuration document store.
//!
//! # Data Flow
//! ```text
//! config file (YAML)
//!     → document.rs (strict parse, root must be a mapping)
//!     → ConfigManager (single in-memory document behind a RwLock)
//!     → get / lookup / set by dotted key ("api.port")
//!     → save: whole document serialized back over the file
//!     → load / reload: file re-read, swapped in only on success
//! ```
//!
//! # Design Decisions
//! - `get` never fails: absent keys and non-mapping intermediates both
//!   return the caller's default. `lookup` keeps the two apart.
//! - `set` refuses to descend through a non-mapping value.
//! - A failed load or save never touches the in-memory document.

pub mod document;
pub mod error;
pub mod manager;

pub use error::{LoadError, LookupError, SaveError, StoreError};
pub use manager::{ConfigManager, StoreState};
