//! Editor state and its transition function.

use std::collections::BTreeMap;

use crate::filter::{ListValidation, PatternIssue, validate_pattern_list};

/// Whether a position is currently being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditMode {
    /// No position under edit; structural actions are allowed.
    #[default]
    Idle,
    /// Position `index` is under edit with uncommitted text `draft`.
    Editing {
        /// Position being edited.
        index: usize,
        /// Working text, committed on [`EditorAction::CommitEdit`].
        draft: String,
    },
}

impl EditMode {
    /// Returns `true` when no position is under edit.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns the position under edit, if any.
    #[must_use]
    pub const fn editing_index(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Editing { index, .. } => Some(*index),
        }
    }
}

/// An operation issued against the priority list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Start editing position `i`, seeding the draft with its current text.
    BeginEdit(usize),
    /// Replace the draft text of the position under edit.
    UpdateDraft(String),
    /// Commit the draft into its position and return to idle.
    CommitEdit,
    /// Discard the draft and return to idle.
    CancelEdit,
    /// Swap position `i` with the one above it.
    MoveUp(usize),
    /// Swap position `i` with the one below it.
    MoveDown(usize),
    /// Delete position `i`.
    Remove(usize),
    /// Add a blank entry at the end and start editing it.
    Append,
    /// Apply a preset pattern.
    ///
    /// With `at: None` the whole list is replaced by the single pattern;
    /// otherwise only position `at` is overwritten.
    ApplyPreset {
        /// Preset pattern text.
        pattern: String,
        /// Position to overwrite, or `None` to reset the list.
        at: Option<usize>,
    },
    /// Insert a preset pattern directly after position `index`.
    InsertPresetAfter {
        /// Position after which the pattern is inserted.
        index: usize,
        /// Preset pattern text.
        pattern: String,
    },
}

impl EditorAction {
    const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MoveUp(_)
                | Self::MoveDown(_)
                | Self::Remove(_)
                | Self::Append
                | Self::ApplyPreset { .. }
                | Self::InsertPresetAfter { .. }
        )
    }
}

/// Why an action left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A structural action or a new edit was issued while editing.
    NotIdle,
    /// A draft action was issued while idle.
    NotEditing,
    /// The position does not exist.
    OutOfRange,
    /// Moving the first position up or the last position down.
    AtBoundary,
}

/// Result of applying an [`EditorAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The pattern list changed; the owner must be notified.
    Mutated,
    /// Only the edit mode or draft changed; nothing to notify.
    ModeChanged,
    /// The action was not applicable.
    Ignored(IgnoreReason),
}

impl Outcome {
    /// Returns `true` if the pattern list changed.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(self, Self::Mutated)
    }
}

/// Owned state of one priority list under edit.
///
/// Holds the ordered patterns, the diagnostics derived from them and the
/// current edit mode. Diagnostics are only ever recomputed as a whole, so
/// entries for removed or shifted positions never linger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityListState {
    patterns: Vec<String>,
    validation: ListValidation,
    mode: EditMode,
}

impl PriorityListState {
    /// Creates an idle state for `patterns` with fresh diagnostics.
    #[must_use]
    pub fn new(patterns: Vec<String>) -> Self {
        let validation = validate_pattern_list(&patterns);
        Self {
            patterns,
            validation,
            mode: EditMode::Idle,
        }
    }

    /// Returns the patterns in priority order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns the diagnostics keyed by position.
    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<usize, PatternIssue> {
        &self.validation.errors
    }

    /// Returns the diagnostic for `index`, if any.
    #[must_use]
    pub fn issue_at(&self, index: usize) -> Option<PatternIssue> {
        self.validation.issue_at(index)
    }

    /// Returns `true` if no position carries a diagnostic.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.validation.is_valid
    }

    /// Returns the current edit mode.
    #[must_use]
    pub const fn mode(&self) -> &EditMode {
        &self.mode
    }

    /// Consumes the state and returns the patterns.
    #[must_use]
    pub fn into_patterns(self) -> Vec<String> {
        self.patterns
    }

    /// Applies `action` and returns the next state with the outcome.
    ///
    /// This is a pure function of its inputs: the same state and action
    /// always give the same result.
    #[must_use]
    pub fn reduce(mut self, action: EditorAction) -> (Self, Outcome) {
        let outcome = self.apply(action);
        if outcome.is_mutation() {
            self.validation = validate_pattern_list(&self.patterns);
        }
        (self, outcome)
    }

    fn apply(&mut self, action: EditorAction) -> Outcome {
        if action.is_structural() && !self.mode.is_idle() {
            return Outcome::Ignored(IgnoreReason::NotIdle);
        }

        match action {
            EditorAction::BeginEdit(index) => self.begin_edit(index),
            EditorAction::UpdateDraft(text) => self.update_draft(text),
            EditorAction::CommitEdit => self.commit_edit(),
            EditorAction::CancelEdit => self.cancel_edit(),
            EditorAction::MoveUp(index) => self.move_up(index),
            EditorAction::MoveDown(index) => self.move_down(index),
            EditorAction::Remove(index) => self.remove(index),
            EditorAction::Append => self.append(),
            EditorAction::ApplyPreset { pattern, at: None } => {
                self.patterns = vec![pattern];
                Outcome::Mutated
            }
            EditorAction::ApplyPreset {
                pattern,
                at: Some(index),
            } => self.overwrite(index, pattern),
            EditorAction::InsertPresetAfter { index, pattern } => {
                self.insert_after(index, pattern)
            }
        }
    }

    fn begin_edit(&mut self, index: usize) -> Outcome {
        if !self.mode.is_idle() {
            return Outcome::Ignored(IgnoreReason::NotIdle);
        }
        let Some(current) = self.patterns.get(index) else {
            return Outcome::Ignored(IgnoreReason::OutOfRange);
        };

        self.mode = EditMode::Editing {
            index,
            draft: current.clone(),
        };
        Outcome::ModeChanged
    }

    fn update_draft(&mut self, text: String) -> Outcome {
        match &mut self.mode {
            EditMode::Editing { draft, .. } => {
                *draft = text;
                Outcome::ModeChanged
            }
            EditMode::Idle => Outcome::Ignored(IgnoreReason::NotEditing),
        }
    }

    fn commit_edit(&mut self) -> Outcome {
        let EditMode::Editing { index, draft } = std::mem::take(&mut self.mode) else {
            return Outcome::Ignored(IgnoreReason::NotEditing);
        };

        match self.patterns.get_mut(index) {
            Some(slot) => {
                *slot = draft;
                Outcome::Mutated
            }
            None => Outcome::Ignored(IgnoreReason::OutOfRange),
        }
    }

    fn cancel_edit(&mut self) -> Outcome {
        if self.mode.is_idle() {
            return Outcome::Ignored(IgnoreReason::NotEditing);
        }
        self.mode = EditMode::Idle;
        Outcome::ModeChanged
    }

    fn move_up(&mut self, index: usize) -> Outcome {
        if index >= self.patterns.len() {
            return Outcome::Ignored(IgnoreReason::OutOfRange);
        }
        if index == 0 {
            return Outcome::Ignored(IgnoreReason::AtBoundary);
        }
        self.patterns.swap(index - 1, index);
        Outcome::Mutated
    }

    fn move_down(&mut self, index: usize) -> Outcome {
        if index >= self.patterns.len() {
            return Outcome::Ignored(IgnoreReason::OutOfRange);
        }
        if index + 1 == self.patterns.len() {
            return Outcome::Ignored(IgnoreReason::AtBoundary);
        }
        self.patterns.swap(index, index + 1);
        Outcome::Mutated
    }

    fn remove(&mut self, index: usize) -> Outcome {
        if index >= self.patterns.len() {
            return Outcome::Ignored(IgnoreReason::OutOfRange);
        }
        self.patterns.remove(index);
        Outcome::Mutated
    }

    fn append(&mut self) -> Outcome {
        self.patterns.push(String::new());
        self.mode = EditMode::Editing {
            index: self.patterns.len() - 1,
            draft: String::new(),
        };
        Outcome::Mutated
    }

    fn overwrite(&mut self, index: usize, pattern: String) -> Outcome {
        match self.patterns.get_mut(index) {
            Some(slot) => {
                *slot = pattern;
                Outcome::Mutated
            }
            None => Outcome::Ignored(IgnoreReason::OutOfRange),
        }
    }

    fn insert_after(&mut self, index: usize, pattern: String) -> Outcome {
        if index >= self.patterns.len() {
            return Outcome::Ignored(IgnoreReason::OutOfRange);
        }
        self.patterns.insert(index + 1, pattern);
        Outcome::Mutated
    }
}
