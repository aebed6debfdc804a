//! File-based preset persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{LoadResult, Preset, PresetError, PresetStore, remove, upsert};

/// Current preset file format version.
const PRESET_FILE_VERSION: u32 = 1;

/// On-disk preset file format.
#[derive(Debug, Serialize, Deserialize)]
struct PresetFile {
    version: u32,
    presets: Vec<Preset>,
}

/// JSON file implementation of [`PresetStore`].
///
/// A missing file means nothing has been saved yet, so the default presets
/// are served. The first mutation writes the defaults together with the
/// change, which keeps the defaults present (and protected) from then on.
///
/// Writes go to `{path}.tmp` first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FilePresetStore {
    path: PathBuf,
}

impl FilePresetStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the preset file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn current(&self) -> Vec<Preset> {
        match self.load() {
            LoadResult::Corrupted { reason } => {
                tracing::warn!(
                    "Preset file {} unusable ({reason}), starting from defaults",
                    self.path.display()
                );
                LoadResult::NotFound.into_presets()
            }
            other => other.into_presets(),
        }
    }

    fn save_blocking(path: &Path, presets: Vec<Preset>) -> Result<(), PresetError> {
        let file = PresetFile {
            version: PRESET_FILE_VERSION,
            presets,
        };
        let content = serde_json::to_string_pretty(&file).map_err(PresetError::Serialize)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(PresetError::Write)?;
            }
        }

        let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
        std::fs::write(&temp_path, content).map_err(PresetError::Write)?;
        std::fs::rename(&temp_path, path).map_err(PresetError::Write)?;

        Ok(())
    }

    async fn write(&self, presets: Vec<Preset>) -> Result<Vec<Preset>, PresetError> {
        let path = self.path.clone();
        let snapshot = presets.clone();

        tokio::task::spawn_blocking(move || Self::save_blocking(&path, snapshot))
            .await
            .map_err(|e| PresetError::Write(std::io::Error::other(e)))??;

        Ok(presets)
    }
}

impl PresetStore for FilePresetStore {
    fn load(&self) -> LoadResult {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadResult::NotFound,
            Err(e) => {
                return LoadResult::Corrupted {
                    reason: format!("Failed to read file: {e}"),
                };
            }
        };

        match serde_json::from_str::<PresetFile>(&content) {
            Ok(file) if file.version == PRESET_FILE_VERSION => LoadResult::Loaded(file.presets),
            Ok(file) => LoadResult::Corrupted {
                reason: format!(
                    "Incompatible version: expected {PRESET_FILE_VERSION}, got {}",
                    file.version
                ),
            },
            Err(e) => LoadResult::Corrupted {
                reason: format!("Invalid JSON: {e}"),
            },
        }
    }

    async fn save(&self, preset: Preset) -> Result<Vec<Preset>, PresetError> {
        let mut presets = self.current();
        upsert(&mut presets, preset)?;
        self.write(presets).await
    }

    async fn delete(&self, id: &str) -> Result<Vec<Preset>, PresetError> {
        let mut presets = self.current();
        remove(&mut presets, id)?;
        self.write(presets).await
    }
}
