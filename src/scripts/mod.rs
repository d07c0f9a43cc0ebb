//! Script payloads attached to the document root.

use std::fs;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};
use log::debug;

use crate::error::{Result, TouchMcuError};

/// Scripts shipped inside the binary.
pub static BUNDLED_SCRIPTS: Dir = include_dir!("$CARGO_MANIFEST_DIR/scripts");

/// Resolves script names to source text
#[derive(Debug, Clone, Default)]
pub struct ScriptLibrary {
    dir: Option<PathBuf>,
}

impl ScriptLibrary {
    /// Only the bundled scripts.
    pub fn bundled() -> Self {
        Self { dir: None }
    }

    /// Scripts in `dir` take precedence over the bundled ones.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Source of a single script.
    pub fn load(&self, name: &str) -> Result<String> {
        let not_found = || TouchMcuError::ScriptNotFound {
            name: name.to_string(),
        };
        let plain = Path::new(name)
            .file_name()
            .map(|f| f == name)
            .unwrap_or(false);
        if !plain {
            return Err(not_found());
        }

        if let Some(dir) = &self.dir {
            let path = dir.join(name);
            if path.is_file() {
                debug!("script {} from {}", name, path.display());
                return fs::read_to_string(&path).map_err(|e| TouchMcuError::FileReadError {
                    path,
                    source: e,
                });
            }
        }

        BUNDLED_SCRIPTS
            .get_file(name)
            .and_then(|f| f.contents_utf8())
            .map(str::to_string)
            .ok_or_else(not_found)
    }

    /// Concatenate several scripts in order, separated by a blank line.
    pub fn load_all(&self, names: &[&str]) -> Result<String> {
        let sources = names
            .iter()
            .map(|name| self.load(name).map(|s| s.trim_end().to_string()))
            .collect::<Result<Vec<_>>>()?;
        Ok(sources.join("\n\n"))
    }
}
