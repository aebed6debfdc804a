//! Environment variable storage for the downstream service.
//!
//! The service reads its settings from a `.env` file. This module provides:
//! - An insertion-ordered variable mapping ([`EnvVars`])
//! - The storage abstraction ([`EnvStore`]) and its file implementation
//!   ([`FileEnvStore`])
//! - Change detection between two mappings ([`diff`], [`EnvChange`])
//! - A non-fatal check of the service's configuration contract ([`audit`])

mod audit;
mod changes;
mod dotenv;
mod file;

#[cfg(test)]
mod audit_tests;
#[cfg(test)]
mod dotenv_tests;

pub use audit::{EnvIssue, audit};
pub use changes::{EnvChange, diff};
pub use file::FileEnvStore;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Well-known variable names.
pub mod keys {
    /// Torrent filter regex: one pattern or a JSON array of patterns.
    pub const TORRENT_FILTER_REGEX: &str = "TORRENT_FILTER_REGEX";
    /// Base URL of the Overseerr instance.
    pub const OVERSEERR_BASE: &str = "OVERSEERR_BASE";
    /// Overseerr API key.
    pub const OVERSEERR_API_KEY: &str = "OVERSEERR_API_KEY";
    /// Trakt API key.
    pub const TRAKT_API_KEY: &str = "TRAKT_API_KEY";
    /// Run the browser without a window.
    pub const HEADLESS_MODE: &str = "HEADLESS_MODE";
    /// Periodically process pending requests.
    pub const ENABLE_AUTOMATIC_BACKGROUND_TASK: &str = "ENABLE_AUTOMATIC_BACKGROUND_TASK";
    /// Periodically check subscribed shows.
    pub const ENABLE_SHOW_SUBSCRIPTION_TASK: &str = "ENABLE_SHOW_SUBSCRIPTION_TASK";
    /// Minutes between background runs.
    pub const REFRESH_INTERVAL_MINUTES: &str = "REFRESH_INTERVAL_MINUTES";
}

/// Insertion-ordered mapping of variable names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    entries: Vec<(String, String)>,
}

impl EnvVars {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key` to `value`, keeping its position if it already exists.
    ///
    /// Returns the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }

        self.entries.push((key, value));
        None
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (key, value) in iter {
            vars.set(key, value);
        }
        vars
    }
}

/// Errors from environment storage.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The environment file exists but could not be read.
    #[error("Failed to read env file '{}': {source}", path.display())]
    Read {
        /// Path to the env file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The environment file could not be written.
    #[error("Failed to write env file '{}': {source}", path.display())]
    Write {
        /// Path to the env file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A key cannot be written in `.env` syntax.
    #[error("Invalid variable name '{0}'")]
    InvalidKey(String),
}

/// Storage for the full variable mapping.
pub trait EnvStore: Send + Sync {
    /// Fetches every variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage exists but cannot be read.
    fn load(&self) -> Result<EnvVars, EnvError>;

    /// Replaces the stored mapping with `vars`.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping cannot be written.
    fn save(
        &self,
        vars: &EnvVars,
    ) -> impl std::future::Future<Output = Result<(), EnvError>> + Send;
}

/// Returns `true` if `key` is a valid variable name.
///
/// Names start with a letter or underscore and continue with letters,
/// digits, underscores or dots.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Mock environment store for testing.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::RwLock;

    /// In-memory [`EnvStore`] that records saves.
    #[derive(Debug, Default)]
    pub struct MockEnvStore {
        vars: RwLock<EnvVars>,
        saves: RwLock<usize>,
    }

    impl MockEnvStore {
        /// Creates a store holding `vars`.
        #[must_use]
        pub fn with_vars(vars: EnvVars) -> Self {
            Self {
                vars: RwLock::new(vars),
                saves: RwLock::new(0),
            }
        }

        /// Returns the currently stored mapping.
        #[must_use]
        pub fn stored(&self) -> EnvVars {
            self.vars.read().unwrap().clone()
        }

        /// Returns how many times `save` was called.
        #[must_use]
        pub fn save_count(&self) -> usize {
            *self.saves.read().unwrap()
        }
    }

    impl EnvStore for MockEnvStore {
        fn load(&self) -> Result<EnvVars, EnvError> {
            Ok(self.stored())
        }

        async fn save(&self, vars: &EnvVars) -> Result<(), EnvError> {
            *self.vars.write().unwrap() = vars.clone();
            *self.saves.write().unwrap() += 1;
            Ok(())
        }
    }
}
