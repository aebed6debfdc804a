//! Live editor that owns a [`PriorityListState`] and notifies its owner.

use std::collections::BTreeMap;
use std::fmt;

use crate::filter::PatternIssue;

use super::state::{EditMode, EditorAction, Outcome, PriorityListState};

/// Interactive editor for a priority list.
///
/// Every accepted mutation replaces the state with the result of
/// [`PriorityListState::reduce`] and then calls `on_change` with the
/// complete new list. Mode-only changes (starting, cancelling, or typing
/// into an edit) are not reported. The editor never persists anything.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use seerr_settings::editor::PriorityListEditor;
///
/// let seen = RefCell::new(Vec::new());
/// let mut editor = PriorityListEditor::new(
///     vec!["x".to_string(), "y".to_string()],
///     |patterns: &[String]| seen.borrow_mut().push(patterns.to_vec()),
/// );
///
/// editor.move_down(0);
/// assert_eq!(editor.patterns(), ["y", "x"]);
/// drop(editor);
/// assert_eq!(seen.into_inner(), vec![vec!["y".to_string(), "x".to_string()]]);
/// ```
pub struct PriorityListEditor<N> {
    state: PriorityListState,
    on_change: N,
}

impl<N> PriorityListEditor<N>
where
    N: FnMut(&[String]),
{
    /// Creates an idle editor over `patterns`.
    ///
    /// Diagnostics are computed immediately; `on_change` is not called.
    #[must_use]
    pub fn new(patterns: Vec<String>, on_change: N) -> Self {
        Self {
            state: PriorityListState::new(patterns),
            on_change,
        }
    }

    /// Applies `action`, notifying the owner if the list changed.
    pub fn dispatch(&mut self, action: EditorAction) -> Outcome {
        tracing::debug!(?action, "Priority list action");

        let state = std::mem::take(&mut self.state);
        let (next, outcome) = state.reduce(action);
        self.state = next;

        match outcome {
            Outcome::Mutated => (self.on_change)(self.state.patterns()),
            Outcome::Ignored(reason) => tracing::debug!(?reason, "Priority list action ignored"),
            Outcome::ModeChanged => {}
        }

        outcome
    }

    /// Starts editing position `index`.
    pub fn begin_edit(&mut self, index: usize) -> Outcome {
        self.dispatch(EditorAction::BeginEdit(index))
    }

    /// Replaces the working text of the position under edit.
    pub fn set_draft(&mut self, text: impl Into<String>) -> Outcome {
        self.dispatch(EditorAction::UpdateDraft(text.into()))
    }

    /// Commits the working text and re-validates the list.
    pub fn save_edit(&mut self) -> Outcome {
        self.dispatch(EditorAction::CommitEdit)
    }

    /// Discards the working text.
    pub fn cancel_edit(&mut self) -> Outcome {
        self.dispatch(EditorAction::CancelEdit)
    }

    /// Moves position `index` one step towards the top.
    pub fn move_up(&mut self, index: usize) -> Outcome {
        self.dispatch(EditorAction::MoveUp(index))
    }

    /// Moves position `index` one step towards the bottom.
    pub fn move_down(&mut self, index: usize) -> Outcome {
        self.dispatch(EditorAction::MoveDown(index))
    }

    /// Removes position `index`.
    pub fn remove(&mut self, index: usize) -> Outcome {
        self.dispatch(EditorAction::Remove(index))
    }

    /// Appends a blank entry and starts editing it.
    pub fn append(&mut self) -> Outcome {
        self.dispatch(EditorAction::Append)
    }

    /// Replaces the whole list with a single preset pattern.
    pub fn apply_preset(&mut self, pattern: impl Into<String>) -> Outcome {
        self.dispatch(EditorAction::ApplyPreset {
            pattern: pattern.into(),
            at: None,
        })
    }

    /// Overwrites position `index` with a preset pattern.
    pub fn apply_preset_at(&mut self, index: usize, pattern: impl Into<String>) -> Outcome {
        self.dispatch(EditorAction::ApplyPreset {
            pattern: pattern.into(),
            at: Some(index),
        })
    }

    /// Inserts a preset pattern right after position `index`.
    pub fn insert_preset_after(&mut self, index: usize, pattern: impl Into<String>) -> Outcome {
        self.dispatch(EditorAction::InsertPresetAfter {
            index,
            pattern: pattern.into(),
        })
    }
}

impl<N> PriorityListEditor<N> {
    /// Returns the current patterns.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        self.state.patterns()
    }

    /// Returns the current diagnostics keyed by position.
    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<usize, PatternIssue> {
        self.state.errors()
    }

    /// Returns `true` if no position carries a diagnostic.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    /// Returns the current edit mode.
    #[must_use]
    pub const fn mode(&self) -> &EditMode {
        self.state.mode()
    }

    /// Consumes the editor and returns the patterns.
    #[must_use]
    pub fn into_patterns(self) -> Vec<String> {
        self.state.into_patterns()
    }
}

impl<N> fmt::Debug for PriorityListEditor<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityListEditor")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
