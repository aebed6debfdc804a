//! `.env` file persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::dotenv::{self, Line};
use super::{EnvError, EnvStore, EnvVars, is_valid_key};

/// `.env` file implementation of [`EnvStore`].
///
/// A missing file reads as an empty mapping. Saving rewrites the file in
/// place: comments, blank lines and untouched assignments are kept as they
/// were, changed values are rewritten on their original line, removed keys
/// disappear and new keys are appended.
///
/// Writes go to `{path}.tmp` first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileEnvStore {
    path: PathBuf,
}

impl FileEnvStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the env file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lines(path: &Path) -> Result<Vec<Line>, EnvError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(dotenv::parse_document(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(EnvError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn save_blocking(path: &Path, vars: &EnvVars) -> Result<(), EnvError> {
        let lines = Self::read_lines(path)?;
        let content = dotenv::render(&lines, vars);

        let write_err = |source| EnvError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
        std::fs::write(&temp_path, content).map_err(write_err)?;
        std::fs::rename(&temp_path, path).map_err(write_err)?;

        Ok(())
    }
}

impl EnvStore for FileEnvStore {
    fn load(&self) -> Result<EnvVars, EnvError> {
        let lines = Self::read_lines(&self.path)?;
        Ok(dotenv::vars_from(&lines))
    }

    async fn save(&self, vars: &EnvVars) -> Result<(), EnvError> {
        if let Some((key, _)) = vars.iter().find(|(key, _)| !is_valid_key(key)) {
            return Err(EnvError::InvalidKey(key.to_string()));
        }

        let path = self.path.clone();
        let snapshot = vars.clone();

        tokio::task::spawn_blocking(move || Self::save_blocking(&path, &snapshot))
            .await
            .map_err(|e| EnvError::Write {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            })?
    }
}
