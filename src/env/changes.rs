//! Change detection between two variable mappings.

use serde::Serialize;

use super::EnvVars;

/// A single variable that differs between two mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvChange {
    /// Variable name.
    pub key: String,
    /// Value before, `None` if the key was added.
    pub old: Option<String>,
    /// Value after, `None` if the key was removed.
    pub new: Option<String>,
}

impl EnvChange {
    /// Returns `true` if the key did not exist before.
    #[must_use]
    pub const fn is_added(&self) -> bool {
        self.old.is_none()
    }

    /// Returns `true` if the key no longer exists.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        self.new.is_none()
    }
}

/// Lists the keys whose values differ between `old` and `new`.
///
/// Changed and removed keys come first in `old` order, followed by added
/// keys in `new` order.
#[must_use]
pub fn diff(old: &EnvVars, new: &EnvVars) -> Vec<EnvChange> {
    let mut changes: Vec<EnvChange> = old
        .iter()
        .filter_map(|(key, before)| {
            let after = new.get(key);
            (after != Some(before)).then(|| EnvChange {
                key: key.to_string(),
                old: Some(before.to_string()),
                new: after.map(str::to_string),
            })
        })
        .collect();

    changes.extend(
        new.iter()
            .filter(|(key, _)| !old.contains_key(key))
            .map(|(key, after)| EnvChange {
                key: key.to_string(),
                old: None,
                new: Some(after.to_string()),
            }),
    );

    changes
}
