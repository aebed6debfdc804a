//! Priority list editor.
//!
//! This module keeps a working copy of the torrent filter priority list
//! under interactive edit:
//! - Owned state and a pure transition function ([`PriorityListState`],
//!   [`EditorAction`], [`Outcome`])
//! - A live editor that applies actions and notifies its owner after every
//!   accepted mutation ([`PriorityListEditor`])
//!
//! # State Machine
//!
//! ```text
//!            BeginEdit(i) / Append
//!   ┌──────┐ ───────────────────────▶ ┌─────────────┐
//!   │ Idle │                          │ Editing(i)  │ ◀─ UpdateDraft
//!   └──────┘ ◀─────────────────────── └─────────────┘
//!      ▲      CommitEdit / CancelEdit
//!      └── MoveUp, MoveDown, Remove, ApplyPreset, InsertPresetAfter
//! ```
//!
//! Structural actions are only accepted while idle. Every accepted mutation
//! recomputes all diagnostics from scratch against the current list.
//! Nothing here fails: rejected or out-of-range actions come back as
//! [`Outcome::Ignored`].

#[allow(clippy::module_inception)]
mod editor;
mod state;

#[cfg(test)]
mod editor_tests;

pub use editor::PriorityListEditor;
pub use state::{EditMode, EditorAction, IgnoreReason, Outcome, PriorityListState};
