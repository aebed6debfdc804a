//! Loading and saving settings as one unit.
//!
//! A [`SettingsSession`] ties the variable store and the preset store
//! together. It derives the editable priority list from the stored filter
//! value and writes the list back in its storage form.

use thiserror::Error;

use crate::env::{EnvChange, EnvError, EnvStore, EnvVars, diff, keys};
use crate::filter::{self, ParsedRegexValue, RegexFormat};
use crate::preset::{Preset, PresetError, PresetStore};

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Variable storage failed.
    #[error(transparent)]
    Env(#[from] EnvError),

    /// Preset storage failed.
    #[error(transparent)]
    Preset(#[from] PresetError),
}

/// The filter as it should be presented for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSnapshot {
    /// What the stored value parsed to.
    pub parsed: ParsedRegexValue,
    /// Patterns to edit.
    pub patterns: Vec<String>,
    /// Format to edit in. Never [`RegexFormat::Empty`].
    pub format: RegexFormat,
    /// `true` when `patterns` are the defaults standing in for an empty value.
    pub seeded_defaults: bool,
}

impl FilterSnapshot {
    /// Derives the snapshot for a stored value.
    ///
    /// An empty value is replaced by [`filter::default_patterns`] in array
    /// format.
    #[must_use]
    pub fn from_stored(raw: Option<&str>) -> Self {
        let parsed = filter::parse(raw);

        if parsed.format == RegexFormat::Empty {
            return Self {
                parsed,
                patterns: filter::default_patterns(),
                format: RegexFormat::Array,
                seeded_defaults: true,
            };
        }

        Self {
            patterns: parsed.patterns.clone(),
            format: parsed.format,
            parsed,
            seeded_defaults: false,
        }
    }
}

/// Everything `load` reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSettings {
    /// Full variable mapping.
    pub vars: EnvVars,
    /// Filter derived from `TORRENT_FILTER_REGEX`.
    pub filter: FilterSnapshot,
}

/// Settings orchestrator over a variable store and a preset store.
#[derive(Debug)]
pub struct SettingsSession<E, P> {
    env: E,
    presets: P,
}

impl<E, P> SettingsSession<E, P> {
    /// Creates a session over the given stores.
    #[must_use]
    pub const fn new(env: E, presets: P) -> Self {
        Self { env, presets }
    }

    /// Returns the variable store.
    #[must_use]
    pub const fn env_store(&self) -> &E {
        &self.env
    }
}

impl<E: EnvStore, P: PresetStore> SettingsSession<E, P> {
    /// Reads the variables and derives the editable filter.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Env`] if the variables cannot be read.
    pub fn load(&self) -> Result<LoadedSettings, SessionError> {
        let vars = self.env.load()?;
        let filter = FilterSnapshot::from_stored(vars.get(keys::TORRENT_FILTER_REGEX));

        if filter.seeded_defaults {
            tracing::debug!("No filter stored, starting from default patterns");
        }

        Ok(LoadedSettings { vars, filter })
    }

    /// Stores `patterns` under `TORRENT_FILTER_REGEX` and saves the full
    /// mapping.
    ///
    /// `vars` is updated in place. Returns the variables that changed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Env`] if the mapping cannot be saved.
    pub async fn save_filter<S: AsRef<str>>(
        &self,
        vars: &mut EnvVars,
        patterns: &[S],
    ) -> Result<Vec<EnvChange>, SessionError> {
        self.set_var(vars, keys::TORRENT_FILTER_REGEX, filter::serialize(patterns))
            .await
    }

    /// Sets one variable and saves the full mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Env`] if the mapping cannot be saved.
    pub async fn set_var(
        &self,
        vars: &mut EnvVars,
        key: &str,
        value: impl Into<String>,
    ) -> Result<Vec<EnvChange>, SessionError> {
        let mut updated = vars.clone();
        updated.set(key, value);
        self.commit(vars, updated).await
    }

    /// Removes one variable and saves the full mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Env`] if the mapping cannot be saved.
    pub async fn unset_var(
        &self,
        vars: &mut EnvVars,
        key: &str,
    ) -> Result<Vec<EnvChange>, SessionError> {
        let mut updated = vars.clone();
        updated.remove(key);
        self.commit(vars, updated).await
    }

    async fn commit(
        &self,
        vars: &mut EnvVars,
        updated: EnvVars,
    ) -> Result<Vec<EnvChange>, SessionError> {
        let changes = diff(vars, &updated);
        if changes.is_empty() {
            tracing::debug!("No variable changed, skipping save");
            return Ok(changes);
        }

        self.env.save(&updated).await?;
        *vars = updated;

        for change in &changes {
            tracing::info!("Saved {}", change.key);
        }
        Ok(changes)
    }

    /// Returns the current presets.
    #[must_use]
    pub fn presets(&self) -> Vec<Preset> {
        self.presets.list()
    }

    /// Inserts or replaces a preset by id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Preset`] if the store rejects the change.
    pub async fn save_preset(&self, preset: Preset) -> Result<Vec<Preset>, SessionError> {
        Ok(self.presets.save(preset).await?)
    }

    /// Deletes a preset by id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Preset`] if the store rejects the change.
    pub async fn delete_preset(&self, id: &str) -> Result<Vec<Preset>, SessionError> {
        Ok(self.presets.delete(id).await?)
    }

    /// Returns `(name, pattern)` pairs for preset matching.
    #[must_use]
    pub fn preset_lookup(&self) -> Vec<(String, String)> {
        self.presets()
            .into_iter()
            .map(|preset| (preset.name, preset.pattern))
            .collect()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
