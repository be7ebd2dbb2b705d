#![forbid(unsafe_code)]

//! Node and tree validation.
//!
//! Checks run in a fixed order (required, range, options, email,
//! pattern) and each yields at most one error. A node's errors are
//! replaced wholesale on every pass, so validating an unchanged tree
//! twice gives the same annotations.

use std::cmp::Ordering;

use formtree_mask::format;

use crate::FieldId;
use crate::error::Error;
use crate::field::{Field, FieldTree, InputType};
use crate::value::Value;

// ---------------------------------------------------------------------------
// Node checks
// ---------------------------------------------------------------------------

fn check_required<Id: FieldId>(field: &Field<Id>) -> Option<Error<Id>> {
    (field.is_required() && field.is_blank()).then(|| Error::IsBlank(field.identifier().cloned()))
}

fn check_range<Id: FieldId>(field: &Field<Id>) -> Option<Error<Id>> {
    let value = field.value();
    let (min, max) = (field.min(), field.max());
    let below = value.compare(min) == Some(Ordering::Less);
    let above = value.compare(max) == Some(Ordering::Greater);
    let id = field.identifier().cloned();

    if !min.is_blank() && !max.is_blank() {
        (below || above).then(|| Error::ValueNotInRange {
            id,
            value: value.clone(),
            min: min.clone(),
            max: max.clone(),
        })
    } else if below {
        Some(Error::ValueTooSmall {
            id,
            value: value.clone(),
            min: min.clone(),
        })
    } else if above {
        Some(Error::ValueTooLarge {
            id,
            value: value.clone(),
            max: max.clone(),
        })
    } else {
        None
    }
}

fn check_options<Id: FieldId>(field: &Field<Id>) -> Option<Error<Id>> {
    (field.is_choice() && field.options().is_empty())
        .then(|| Error::NoOptionsProvided(field.identifier().cloned()))
}

fn check_email<Id: FieldId>(field: &Field<Id>) -> Option<Error<Id>> {
    if field.input_type() != &InputType::Email {
        return None;
    }
    match field.value() {
        Value::Blank => None,
        Value::Text(address) if is_valid_email(address) => None,
        _ => Some(Error::EmailInvalid(field.identifier().cloned())),
    }
}

/// Reformats the value against the mask, then reports whether the mask
/// was filled. The reformatted value is kept either way.
fn check_pattern<Id: FieldId>(field: &mut Field<Id>) -> Option<Error<Id>> {
    let mask = field.pattern()?;
    let input = field.value().to_string()?;
    let out = format(mask, &input, input.chars().count());
    let reformatted = field.input_string_to_value(&out.formatted);
    field.set_value(reformatted);
    (!out.consumed).then(|| Error::PatternError(field.identifier().cloned()))
}

/// Email syntax accepted by browsers for `<input type="email">`: a local
/// part of atext and dots, then dot-separated labels of at most 63
/// alphanumerics or hyphens that neither start nor end with a hyphen.
#[must_use]
pub fn is_valid_email(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c));
    let domain_ok = domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    local_ok && domain_ok
}

/// Recompute one node's errors and store them on the node.
///
/// Containers only get the options check; their children are validated
/// separately.
pub fn validate_node<Id: FieldId>(field: &mut Field<Id>) -> Result<(), Error<Id>> {
    let mut errors = Vec::new();
    if field.is_container() {
        errors.extend(check_options(field));
    } else {
        errors.extend(check_required(field));
        errors.extend(check_range(field));
        errors.extend(check_options(field));
        errors.extend(check_email(field));
        errors.extend(check_pattern(field));
    }
    field.set_errors(errors);
    tracing::trace!(
        identifier = ?field.identifier(),
        error_count = field.errors().len(),
        "validated node"
    );
    match field.combined_error() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tree passes
// ---------------------------------------------------------------------------

/// Validate every node that is not inside a hidden subtree.
///
/// Hidden subtrees are not checked and their stored errors are dropped,
/// so errors from a pass made before the node was hidden never resurface.
///
/// On failure returns one combined error per failing node, in depth-first
/// order. Use [`Error::combine_all`] to fold them into a single error.
pub fn validate_tree<Id: FieldId>(tree: &mut FieldTree<Id>) -> Result<(), Vec<Error<Id>>> {
    let _span = tracing::debug_span!("validate_tree", nodes = tree.size()).entered();
    let mut errors = Vec::new();
    validate_subtree(tree, &mut errors);
    tracing::debug!(error_count = errors.len(), "validation pass finished");
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn validate_subtree<Id: FieldId>(tree: &mut FieldTree<Id>, errors: &mut Vec<Error<Id>>) {
    if tree.value().is_hidden() {
        tree.for_each_mut(Field::clear_errors);
        return;
    }
    if let Err(error) = validate_node(tree.value_mut()) {
        crate::error::push_unique(errors, error);
    }
    for child in tree.children_mut() {
        validate_subtree(child, errors);
    }
}

/// Current per-node errors outside hidden subtrees, depth-first, without
/// revalidating.
#[must_use]
pub fn collect_errors<Id: FieldId>(tree: &FieldTree<Id>) -> Vec<Error<Id>> {
    let mut errors = Vec::new();
    collect_subtree(tree, &mut errors);
    errors
}

fn collect_subtree<Id: FieldId>(tree: &FieldTree<Id>, errors: &mut Vec<Error<Id>>) {
    if tree.value().is_hidden() {
        return;
    }
    if let Some(error) = tree.value().combined_error() {
        crate::error::push_unique(errors, error);
    }
    for child in tree.children() {
        collect_subtree(child, errors);
    }
}
