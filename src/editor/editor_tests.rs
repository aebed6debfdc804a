//! Tests for the live priority list editor.

use std::cell::RefCell;
use std::rc::Rc;

use super::editor::PriorityListEditor;
use super::state::{EditMode, IgnoreReason, Outcome};
use crate::filter::PatternIssue;

/// Records every notification the editor sends.
#[derive(Clone, Default)]
struct Recorder {
    calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl Recorder {
    fn callback(&self) -> impl FnMut(&[String]) + use<> {
        let calls = Rc::clone(&self.calls);
        move |patterns: &[String]| calls.borrow_mut().push(patterns.to_vec())
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    fn count(&self) -> usize {
        self.calls.borrow().len()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

#[test]
fn construction_does_not_notify() {
    let recorder = Recorder::default();
    let editor = PriorityListEditor::new(strings(&["a", "("]), recorder.callback());

    assert_eq!(recorder.count(), 0);
    assert_eq!(editor.errors().get(&1), Some(&PatternIssue::InvalidSyntax));
}

#[test]
fn move_down_notifies_once_with_new_order() {
    let recorder = Recorder::default();
    let mut editor = PriorityListEditor::new(strings(&["x", "y"]), recorder.callback());

    let outcome = editor.move_down(0);

    assert_eq!(outcome, Outcome::Mutated);
    assert_eq!(editor.patterns(), ["y", "x"]);
    assert!(editor.mode().is_idle());
    assert_eq!(recorder.calls(), vec![strings(&["y", "x"])]);
}

#[test]
fn noop_moves_do_not_notify() {
    let recorder = Recorder::default();
    let mut editor = PriorityListEditor::new(strings(&["x", "y"]), recorder.callback());

    assert_eq!(
        editor.move_up(0),
        Outcome::Ignored(IgnoreReason::AtBoundary)
    );
    assert_eq!(
        editor.move_down(1),
        Outcome::Ignored(IgnoreReason::AtBoundary)
    );
    assert_eq!(recorder.count(), 0);
}

#[test]
fn edit_session_notifies_only_on_save() {
    let recorder = Recorder::default();
    let mut editor = PriorityListEditor::new(strings(&["a"]), recorder.callback());

    editor.begin_edit(0);
    editor.set_draft("1080p");
    assert_eq!(recorder.count(), 0);

    editor.save_edit();
    assert_eq!(recorder.calls(), vec![strings(&["1080p"])]);
    assert!(editor.mode().is_idle());
}

#[test]
fn cancel_does_not_notify() {
    let recorder = Recorder::default();
    let mut editor = PriorityListEditor::new(strings(&["a"]), recorder.callback());

    editor.begin_edit(0);
    editor.set_draft("changed");
    editor.cancel_edit();

    assert_eq!(recorder.count(), 0);
    assert_eq!(editor.patterns(), ["a"]);
}

#[test]
fn append_notifies_and_enters_editing() {
    let recorder = Recorder::default();
    let mut editor = PriorityListEditor::new(strings(&["a", "b"]), recorder.callback());

    editor.append();

    assert_eq!(recorder.calls(), vec![strings(&["a", "b", ""])]);
    assert_eq!(
        editor.mode(),
        &EditMode::Editing {
            index: 2,
            draft: String::new()
        }
    );
    assert_eq!(editor.errors().get(&2), Some(&PatternIssue::Empty));

    editor.set_draft("c");
    editor.save_edit();

    assert_eq!(recorder.count(), 2);
    assert_eq!(editor.patterns(), ["a", "b", "c"]);
    assert!(editor.is_valid());
}

#[test]
fn preset_operations_notify_with_full_list() {
    let recorder = Recorder::default();
    let mut editor = PriorityListEditor::new(strings(&["a", "b"]), recorder.callback());

    editor.insert_preset_after(0, "p");
    editor.apply_preset_at(2, "q");
    editor.apply_preset("only");

    assert_eq!(
        recorder.calls(),
        vec![
            strings(&["a", "p", "b"]),
            strings(&["a", "p", "q"]),
            strings(&["only"]),
        ]
    );
}

#[test]
fn invalid_patterns_do_not_block_other_operations() {
    let recorder = Recorder::default();
    let mut editor = PriorityListEditor::new(strings(&["(", "a", "a"]), recorder.callback());
    assert!(!editor.is_valid());

    editor.move_down(0);
    assert_eq!(editor.patterns(), ["a", "(", "a"]);
    editor.remove(1);

    assert_eq!(editor.patterns(), ["a", "a"]);
    assert_eq!(editor.errors().get(&1), Some(&PatternIssue::Duplicate));
    assert_eq!(recorder.count(), 2);
}

#[test]
fn structural_action_while_editing_is_ignored_without_notification() {
    let recorder = Recorder::default();
    let mut editor = PriorityListEditor::new(strings(&["a", "b"]), recorder.callback());

    editor.begin_edit(1);
    let outcome = editor.remove(0);

    assert_eq!(outcome, Outcome::Ignored(IgnoreReason::NotIdle));
    assert_eq!(editor.patterns(), ["a", "b"]);
    assert_eq!(recorder.count(), 0);
}

#[test]
fn into_patterns_returns_working_copy() {
    let mut editor = PriorityListEditor::new(strings(&["a"]), |_: &[String]| {});
    editor.insert_preset_after(0, "b");
    assert_eq!(editor.into_patterns(), strings(&["a", "b"]));
}

#[test]
fn debug_shows_state() {
    let editor = PriorityListEditor::new(strings(&["a"]), |_: &[String]| {});
    let debug = format!("{editor:?}");
    assert!(debug.contains("PriorityListEditor"));
    assert!(debug.contains("patterns"));
}
