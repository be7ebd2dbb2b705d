#![forbid(unsafe_code)]

//! JSON encoding of a field tree, and loading values back from JSON.
//!
//! Names drive the mapping. A named leaf becomes a key; a named group
//! nests its children under its key; an unnamed group splices its
//! children into the enclosing object. Repeatables must be named and
//! become arrays whose elements are objects (container entries) or bare
//! values (leaf entries). Unnamed leaves are left out.

use serde_json::{Map, Value as Json};

use crate::FieldId;
use crate::error::{Error, push_unique};
use crate::field::{Field, FieldTree, InputType};
use crate::value::Value;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode `tree` as a JSON object.
pub fn encode<Id: FieldId>(tree: &FieldTree<Id>) -> Result<Json, Vec<Error<Id>>> {
    let mut object = Map::new();
    let mut errors = Vec::new();
    encode_into(tree, &mut object, &mut errors);
    if errors.is_empty() {
        Ok(Json::Object(object))
    } else {
        Err(errors)
    }
}

fn encode_into<Id: FieldId>(tree: &FieldTree<Id>, object: &mut Map<String, Json>, errors: &mut Vec<Error<Id>>) {
    let field = tree.value();
    match (field.input_type(), field.name()) {
        (InputType::Group, None) => encode_children(tree, object, errors),
        (InputType::Group, Some(name)) => {
            let mut nested = Map::new();
            encode_children(tree, &mut nested, errors);
            object.insert(name.to_owned(), Json::Object(nested));
        }
        (InputType::Repeatable(_), None) => {
            push_unique(errors, Error::RepeatableHasNoName(field.identifier().cloned()));
        }
        (InputType::Repeatable(_), Some(name)) => {
            let items = tree
                .children()
                .iter()
                .map(|child| encode_element(child, errors))
                .collect();
            object.insert(name.to_owned(), Json::Array(items));
        }
        (_, Some(name)) => {
            object.insert(name.to_owned(), field.value().encode());
        }
        (_, None) => {}
    }
}

fn encode_children<Id: FieldId>(tree: &FieldTree<Id>, object: &mut Map<String, Json>, errors: &mut Vec<Error<Id>>) {
    for child in tree.children() {
        encode_into(child, object, errors);
    }
}

fn encode_element<Id: FieldId>(child: &FieldTree<Id>, errors: &mut Vec<Error<Id>>) -> Json {
    match child.value().input_type() {
        InputType::Group => {
            let mut object = Map::new();
            encode_children(child, &mut object, errors);
            Json::Object(object)
        }
        InputType::Repeatable(_) => {
            let mut object = Map::new();
            encode_into(child, &mut object, errors);
            Json::Object(object)
        }
        _ => child.value().value().encode(),
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Load values from `json` onto the leaves whose name paths match.
///
/// Keys missing from `json` leave their fields untouched. Repeatables are
/// resized to the array length within their bounds. Each mismatch is
/// recorded as a `ParseError` on the node concerned and loading goes on.
pub fn update_values_from_json<Id: FieldId>(
    tree: &mut FieldTree<Id>,
    json: &Json,
) -> Result<(), Vec<Error<Id>>> {
    let mut errors = Vec::new();
    match json {
        Json::Object(object) => decode_into(tree, object, &mut errors),
        _ => mismatch(tree.value_mut(), json, &mut errors),
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn mismatch<Id: FieldId>(field: &mut Field<Id>, json: &Json, errors: &mut Vec<Error<Id>>) {
    tracing::debug!(identifier = ?field.identifier(), name = ?field.name(), %json, "json does not fit field");
    let error = Error::ParseError(field.identifier().cloned());
    field.add_error(error.clone());
    push_unique(errors, error);
}

fn decode_into<Id: FieldId>(tree: &mut FieldTree<Id>, object: &Map<String, Json>, errors: &mut Vec<Error<Id>>) {
    let field = tree.value();
    let entry = field.name().and_then(|name| object.get(name));
    match (field.input_type(), field.name().is_some()) {
        (InputType::Group, false) => decode_children(tree, object, errors),
        (InputType::Group, true) => match entry {
            Some(Json::Object(nested)) => decode_children(tree, nested, errors),
            None | Some(Json::Null) => {}
            Some(other) => mismatch(tree.value_mut(), other, errors),
        },
        (InputType::Repeatable(_), _) => match entry {
            Some(Json::Array(items)) => decode_items(tree, items, errors),
            None | Some(Json::Null) => {}
            Some(other) => mismatch(tree.value_mut(), other, errors),
        },
        (_, true) => {
            if let Some(json) = entry {
                decode_leaf(tree.value_mut(), json, errors);
            }
        }
        (_, false) => {}
    }
}

fn decode_children<Id: FieldId>(tree: &mut FieldTree<Id>, object: &Map<String, Json>, errors: &mut Vec<Error<Id>>) {
    for child in tree.children_mut() {
        decode_into(child, object, errors);
    }
}

/// Resize a repeatable to fit `items`, then load each entry.
fn decode_items<Id: FieldId>(tree: &mut FieldTree<Id>, items: &[Json], errors: &mut Vec<Error<Id>>) {
    let field = tree.value();
    let Some(template) = field.template().cloned() else {
        return;
    };
    let mut target = items.len().max(field.repeatable_min());
    if let Some(max) = field.repeatable_max()
        && target > max
    {
        target = max;
        let overflow = Json::Array(items.to_vec());
        mismatch(tree.value_mut(), &overflow, errors);
    }

    let children = tree.children_mut();
    children.truncate(target);
    while children.len() < target {
        children.push(template.clone());
    }
    for (child, item) in children.iter_mut().zip(items) {
        decode_element(child, item, errors);
    }
}

fn decode_element<Id: FieldId>(child: &mut FieldTree<Id>, item: &Json, errors: &mut Vec<Error<Id>>) {
    match (child.value().input_type(), item) {
        (InputType::Group, Json::Object(object)) => decode_children(child, object, errors),
        (InputType::Repeatable(_), Json::Object(object)) => decode_into(child, object, errors),
        (InputType::Group | InputType::Repeatable(_), other) => mismatch(child.value_mut(), other, errors),
        (_, scalar) => decode_leaf(child.value_mut(), scalar, errors),
    }
}

fn decode_leaf<Id: FieldId>(field: &mut Field<Id>, json: &Json, errors: &mut Vec<Error<Id>>) {
    match json_to_value(field, json) {
        Some(value) => field.set_value(value),
        None => mismatch(field, json, errors),
    }
}

/// The value a leaf should hold for `json`, if it can hold one.
fn json_to_value<Id: FieldId>(field: &Field<Id>, json: &Json) -> Option<Value> {
    if json.is_null() {
        return Some(Value::Blank);
    }
    if field.is_choice() {
        return field
            .options()
            .iter()
            .find(|(_, value)| value.encode() == *json)
            .map(|(_, value)| value.clone());
    }
    match (field.input_type(), json) {
        (_, Json::String(s)) => Some(field.input_string_to_value(s)),
        (InputType::Checkbox, Json::Bool(b)) => Some(Value::Boolean(*b)),
        (InputType::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
        (InputType::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
        (
            InputType::Text | InputType::TextArea | InputType::Password | InputType::Email,
            Json::Number(n),
        ) => Some(Value::Text(n.to_string())),
        _ => None,
    }
}
