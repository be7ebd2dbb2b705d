#![forbid(unsafe_code)]

//! UI events and the tree edits they cause.
//!
//! A renderer reports what the user did as a [`FieldEvent`] addressed by
//! path; [`handle_event`] applies it. Every handler returns `true` when
//! the tree changed and `false` when the event was refused or did not
//! resolve to a suitable node.

use formtree_mask::format;

use crate::FieldId;
use crate::config::FormConfig;
use crate::field::{FieldTree, InputType};
use crate::validate::validate_node;
use crate::value::Value;

/// A user interaction with one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// Raw text typed into a leaf, with the caret offset in characters.
    Changed {
        path: Vec<usize>,
        input: String,
        cursor: Option<usize>,
    },
    /// A checkbox was toggled.
    Checked { path: Vec<usize>, checked: bool },
    Focused { path: Vec<usize> },
    Blurred { path: Vec<usize> },
    /// Append a template clone to the repeatable at `path`.
    Added { path: Vec<usize> },
    /// Remove the repeatable entry at `path`.
    Removed { path: Vec<usize> },
}

/// Apply `event` to `tree`. Returns `true` if the tree changed.
pub fn handle_event<Id: FieldId>(tree: &mut FieldTree<Id>, event: &FieldEvent, config: &FormConfig) -> bool {
    match event {
        FieldEvent::Changed {
            path,
            input,
            cursor,
        } => on_change(tree, path, input, *cursor, config),
        FieldEvent::Checked { path, checked } => on_check(tree, path, *checked, config),
        FieldEvent::Focused { path } => on_focus(tree, path),
        FieldEvent::Blurred { path } => on_blur(tree, path),
        FieldEvent::Added { path } => on_add(tree, path, config),
        FieldEvent::Removed { path } => on_remove(tree, path, config),
    }
}

/// Store raw input on a leaf, reformatting it first if the leaf has a
/// mask. The caret position is kept on the field.
pub fn on_change<Id: FieldId>(
    tree: &mut FieldTree<Id>,
    path: &[usize],
    input: &str,
    cursor: Option<usize>,
    config: &FormConfig,
) -> bool {
    let Some(node) = tree.get_mut(path) else {
        return false;
    };
    let field = node.value_mut();
    if field.is_container() || field.is_disabled() {
        return false;
    }

    let (value, cursor) = match field.pattern() {
        Some(mask) => {
            let out = format(mask, input, cursor.unwrap_or(input.chars().count()));
            (field.input_string_to_value(&out.formatted), Some(out.cursor))
        }
        None => (field.input_string_to_value(input), cursor),
    };
    field.set_value(value);
    field.set_cursor(cursor);
    if config.revalidate_on_change {
        validate_node(field).ok();
    }
    true
}

/// Set a checkbox.
pub fn on_check<Id: FieldId>(tree: &mut FieldTree<Id>, path: &[usize], checked: bool, config: &FormConfig) -> bool {
    let Some(node) = tree.get_mut(path) else {
        return false;
    };
    let field = node.value_mut();
    if field.input_type() != &InputType::Checkbox || field.is_disabled() {
        return false;
    }
    field.set_value(Value::Boolean(checked));
    if config.revalidate_on_change {
        validate_node(field).ok();
    }
    true
}

pub fn on_focus<Id: FieldId>(tree: &mut FieldTree<Id>, path: &[usize]) -> bool {
    tree.update(path, |node| node.value_mut().focus())
}

/// Mark the field touched and revalidate it so its errors show.
pub fn on_blur<Id: FieldId>(tree: &mut FieldTree<Id>, path: &[usize]) -> bool {
    tree.update(path, |node| {
        let field = node.value_mut();
        field.blur();
        validate_node(field).ok();
    })
}

/// Append a fresh template clone to a repeatable.
pub fn on_add<Id: FieldId>(tree: &mut FieldTree<Id>, path: &[usize], config: &FormConfig) -> bool {
    let Some(node) = tree.get_mut(path) else {
        return false;
    };
    let field = node.value();
    let Some(template) = field.template().cloned() else {
        return false;
    };
    if config.enforce_repeatable_bounds
        && let Some(max) = field.repeatable_max()
        && node.children().len() >= max
    {
        tracing::debug!(identifier = ?field.identifier(), max, "add refused: repeatable is full");
        return false;
    }
    node.children_mut().push(template);
    tracing::debug!(?path, len = node.children().len(), "repeatable entry added");
    true
}

/// Remove a repeatable entry. `path` addresses the entry itself.
pub fn on_remove<Id: FieldId>(tree: &mut FieldTree<Id>, path: &[usize], config: &FormConfig) -> bool {
    let Some((_, parent_path)) = path.split_last() else {
        return false;
    };
    let Some(parent) = tree.get(parent_path) else {
        return false;
    };
    let field = parent.value();
    if !matches!(field.input_type(), InputType::Repeatable(_)) {
        return false;
    }
    if config.enforce_repeatable_bounds && parent.children().len() <= field.repeatable_min() {
        tracing::debug!(
            identifier = ?field.identifier(),
            min = field.repeatable_min(),
            "remove refused: repeatable at minimum"
        );
        return false;
    }
    let removed = tree.remove(path).is_some();
    if removed {
        tracing::debug!(?path, "repeatable entry removed");
    }
    removed
}
