//! Named, reusable filter patterns.
//!
//! This module provides:
//! - The [`Preset`] record and the built-in [`default_presets`]
//! - The [`PresetStore`] abstraction (list/save/delete keyed by id)
//! - A JSON file implementation ([`FilePresetStore`])
//!
//! Default presets ship with the tool and are read-only: stores reject any
//! attempt to overwrite or delete them.

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FilePresetStore;

use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named pattern that can be applied to the priority list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Regular expression source.
    pub pattern: String,
    /// Seeded with the tool; cannot be edited or deleted.
    #[serde(default)]
    pub is_default: bool,
    /// Optional explanation shown next to the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Preset {
    /// Creates a user preset with an explicit id.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pattern: pattern.into(),
            is_default: false,
            description: None,
        }
    }

    /// Creates a user preset with a generated id.
    ///
    /// Ids have the form `custom-<unix millis>`.
    #[must_use]
    pub fn custom(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        Self::new(format!("custom-{millis}"), name, pattern)
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn builtin(id: &str, name: &str, pattern: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            pattern: pattern.to_string(),
            is_default: true,
            description: Some(description.to_string()),
        }
    }
}

/// Presets installed with the tool.
#[must_use]
pub fn default_presets() -> Vec<Preset> {
    vec![
        Preset::builtin(
            "default-uhd",
            "4K / UHD",
            r"(?i)(?:2160p|4k|uhd)",
            "Any 2160p release",
        ),
        Preset::builtin(
            "default-uhd-remux",
            "4K Remux",
            r"(?i)^(?:.*(?:2160p|4k|uhd)).*(?:remux|bluray)",
            "2160p remuxes and Blu-ray encodes",
        ),
        Preset::builtin(
            "default-fhd",
            "1080p",
            r"(?i)1080p",
            "Any 1080p release",
        ),
        Preset::builtin(
            "default-fhd-web",
            "1080p BluRay / WEB-DL",
            r"(?i)^(?:.*1080p).*(?:bluray|web-?dl)",
            "1080p Blu-ray encodes and web downloads",
        ),
        Preset::builtin(
            "default-hd",
            "720p or 1080p",
            r"(?i)(?:720p|1080p)",
            "Anything HD",
        ),
    ]
}

/// Returns `(name, pattern)` pairs in collection order.
///
/// This is the shape consumed by
/// [`find_preset_for_pattern`](crate::filter::find_preset_for_pattern) and
/// [`match_sequence_to_preset_name`](crate::filter::match_sequence_to_preset_name).
pub fn name_pattern_pairs(presets: &[Preset]) -> impl Iterator<Item = (&str, &str)> {
    presets
        .iter()
        .map(|preset| (preset.name.as_str(), preset.pattern.as_str()))
}

/// Finds a preset by exact name, falling back to id.
#[must_use]
pub fn find_by_name_or_id<'a>(presets: &'a [Preset], key: &str) -> Option<&'a Preset> {
    presets
        .iter()
        .find(|preset| preset.name == key)
        .or_else(|| presets.iter().find(|preset| preset.id == key))
}

/// Result of loading presets from persistent storage.
#[derive(Debug, Clone)]
pub enum LoadResult {
    /// Presets were read successfully.
    Loaded(Vec<Preset>),

    /// No preset file exists yet (fresh install).
    NotFound,

    /// A preset file exists but could not be used.
    Corrupted {
        /// Reason for corruption (for logging).
        reason: String,
    },
}

impl LoadResult {
    /// Returns the loaded presets, or the defaults for `NotFound`/`Corrupted`.
    #[must_use]
    pub fn into_presets(self) -> Vec<Preset> {
        match self {
            Self::Loaded(presets) => presets,
            Self::NotFound | Self::Corrupted { .. } => default_presets(),
        }
    }

    /// Returns `true` if presets were read from storage.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Errors from preset mutations.
///
/// Read-side problems are modelled as [`LoadResult`] variants instead.
#[derive(Debug, Error)]
pub enum PresetError {
    /// No preset with this id exists.
    #[error("Preset not found: {0}")]
    NotFound(String),

    /// Default presets cannot be edited or deleted.
    #[error("Cannot modify default preset: {0}")]
    ReadOnlyDefault(String),

    /// Failed to write the preset file.
    #[error("Failed to write preset file: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize presets to JSON.
    #[error("Failed to serialize presets: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Persistent collection of presets keyed by id.
///
/// Every mutation returns the full collection as it stands afterwards.
pub trait PresetStore: Send + Sync {
    /// Loads the stored presets.
    fn load(&self) -> LoadResult;

    /// Returns the current presets, defaults included.
    fn list(&self) -> Vec<Preset> {
        self.load().into_presets()
    }

    /// Inserts or replaces a preset by id.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::ReadOnlyDefault`] when `preset` would replace
    /// a default preset, or a write error.
    fn save(
        &self,
        preset: Preset,
    ) -> impl std::future::Future<Output = Result<Vec<Preset>, PresetError>> + Send;

    /// Deletes a preset by id.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::NotFound`] for unknown ids,
    /// [`PresetError::ReadOnlyDefault`] for default presets, or a write error.
    fn delete(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Preset>, PresetError>> + Send;
}

/// Applies an upsert to an in-memory collection.
///
/// # Errors
///
/// Returns [`PresetError::ReadOnlyDefault`] if the id belongs to a default.
pub fn upsert(presets: &mut Vec<Preset>, mut preset: Preset) -> Result<(), PresetError> {
    match presets.iter_mut().find(|existing| existing.id == preset.id) {
        Some(existing) if existing.is_default => Err(PresetError::ReadOnlyDefault(preset.id)),
        Some(existing) => {
            preset.is_default = false;
            *existing = preset;
            Ok(())
        }
        None => {
            preset.is_default = false;
            presets.push(preset);
            Ok(())
        }
    }
}

/// Removes a preset by id from an in-memory collection.
///
/// # Errors
///
/// Returns [`PresetError::NotFound`] or [`PresetError::ReadOnlyDefault`].
pub fn remove(presets: &mut Vec<Preset>, id: &str) -> Result<(), PresetError> {
    let Some(position) = presets.iter().position(|preset| preset.id == id) else {
        return Err(PresetError::NotFound(id.to_string()));
    };

    if presets[position].is_default {
        return Err(PresetError::ReadOnlyDefault(id.to_string()));
    }

    presets.remove(position);
    Ok(())
}
