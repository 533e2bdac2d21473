//! Default config template.

use std::fs;
use std::path::{Path, PathBuf};

use crate::bootstrap::BootstrapError;

/// Template compiled into the binary.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/config.default.yml");

/// Source of the initial config file content.
#[derive(Debug, Clone, Default)]
pub enum Template {
    /// The template shipped with this crate.
    #[default]
    Bundled,
    /// An operator-supplied template file, copied verbatim.
    File(PathBuf),
}

impl Template {
    /// Fail early when an operator-supplied template is not a file.
    pub fn check(&self) -> Result<(), BootstrapError> {
        match self {
            Template::File(source) if !source.is_file() => {
                Err(BootstrapError::TemplateMissing(source.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Write the template to `target`. The parent directory must exist.
    pub fn install(&self, target: &Path) -> Result<(), BootstrapError> {
        let written = match self {
            Template::Bundled => fs::write(target, DEFAULT_TEMPLATE),
            Template::File(source) => {
                self.check()?;
                fs::copy(source, target).map(|_| ())
            }
        };
        written.map_err(|source| BootstrapError::Write {
            path: target.to_path_buf(),
            source,
        })
    }
}
