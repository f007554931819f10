use crate::error::{Result, UpdaterError};
use crate::sources::Catalog;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and rewrites the sources file on disk.
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and parse the whole document.
    pub fn load(&self) -> Result<Catalog> {
        let content = fs::read_to_string(&self.path).map_err(|e| UpdaterError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let value = serde_json::from_str(&content)
            .map_err(|e| UpdaterError::Parse(format!("{}: {}", self.path.display(), e)))?;

        Catalog::from_value(value)
    }

    /// Overwrite the file with an already rendered document.
    pub fn save(&self, rendered: &str) -> Result<()> {
        fs::write(&self.path, rendered).map_err(|e| UpdaterError::Write {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}
