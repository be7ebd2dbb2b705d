#![forbid(unsafe_code)]

//! Declarative field constructors.
//!
//! Each constructor builds a one-node (or, for containers, a rooted)
//! [`FieldTree`] from an input type and an attribute list.

use formtree_tree::Tree;

use crate::FieldId;
use crate::attribute::Attribute;
use crate::field::{Field, FieldTree, InputType};

fn leaf<Id: FieldId>(
    input_type: InputType<Id>,
    attributes: impl IntoIterator<Item = Attribute<Id>>,
) -> FieldTree<Id> {
    Tree::leaf(Field::init(input_type, attributes))
}

pub fn text<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::Text, attributes)
}

pub fn textarea<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::TextArea, attributes)
}

pub fn email<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::Email, attributes)
}

pub fn password<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::Password, attributes)
}

/// Text input that only accepts an option's display text.
pub fn strict_autocomplete<Id: FieldId>(
    attributes: impl IntoIterator<Item = Attribute<Id>>,
) -> FieldTree<Id> {
    leaf(InputType::StrictAutocomplete, attributes)
}

pub fn int<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::Integer, attributes)
}

pub fn float<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::Float, attributes)
}

pub fn month<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::Month, attributes)
}

pub fn date<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::Date, attributes)
}

/// Local date and time, stored as UTC.
pub fn datetime<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::LocalDatetime, attributes)
}

pub fn select<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::Select, attributes)
}

pub fn radio<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::Radio, attributes)
}

pub fn checkbox<Id: FieldId>(attributes: impl IntoIterator<Item = Attribute<Id>>) -> FieldTree<Id> {
    leaf(InputType::Checkbox, attributes)
}

/// A container for `children`. Unnamed groups are transparent in JSON.
pub fn group<Id: FieldId>(
    attributes: impl IntoIterator<Item = Attribute<Id>>,
    children: Vec<FieldTree<Id>>,
) -> FieldTree<Id> {
    Tree::branch(Field::init(InputType::Group, attributes), children)
}

/// A variable-length list of `template` clones.
///
/// `initial` holds one attribute list per starting child, applied to the
/// root of that child's template clone. The list is padded with plain
/// clones up to `repeatable_min` and truncated to `repeatable_max`.
pub fn repeatable<Id: FieldId>(
    attributes: impl IntoIterator<Item = Attribute<Id>>,
    template: FieldTree<Id>,
    initial: Vec<Vec<Attribute<Id>>>,
) -> FieldTree<Id> {
    let field = Field::init(InputType::Repeatable(Box::new(template.clone())), attributes);
    let target = initial.len().max(field.repeatable_min());
    let target = field.repeatable_max().map_or(target, |max| target.min(max));

    let mut initial = initial.into_iter();
    let children = (0..target)
        .map(|_| {
            let mut child = template.clone();
            if let Some(attributes) = initial.next() {
                child.value_mut().update_attributes(attributes);
            }
            child
        })
        .collect();
    Tree::branch(field, children)
}
