#![forbid(unsafe_code)]

//! Declarative field attributes.
//!
//! A field is described by its input type plus an ordered list of
//! [`Attribute`]s, applied left to right over the defaults. The [`attr`]
//! module offers one constructor per attribute for readable definitions:
//!
//! ```
//! use formtree_core::{attr, construct, Value};
//!
//! let age = construct::int::<&str>([
//!     attr::identifier("age"),
//!     attr::label("Age"),
//!     attr::required(true),
//!     attr::min(Value::Integer(18)),
//! ]);
//! assert_eq!(age.value().label(), Some("Age"));
//! ```

use formtree_mask::Mask;

use crate::value::Value;

/// One attribute setter.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute<Id> {
    Identifier(Id),
    /// JSON key used by encode/decode.
    Name(String),
    Label(String),
    Placeholder(String),
    Hint(String),
    Required(bool),
    Min(Value),
    Max(Value),
    Step(Value),
    Value(Value),
    /// Raw input, coerced according to the field's input type. Place it
    /// after `Options` on choice fields.
    StringValue(String),
    Options(Vec<(String, Value)>),
    Pattern(Mask),
    RepeatableMin(usize),
    RepeatableMax(Option<usize>),
    AddButtonCopy(String),
    RemoveButtonCopy(String),
    Classes(Vec<String>),
    Disabled(bool),
    Hidden(bool),
    /// HTML `autocomplete` hint for renderers.
    Autocomplete(String),
}

/// Attribute constructors.
pub mod attr {
    use super::Attribute;
    use crate::value::Value;
    use formtree_mask::Mask;

    pub fn identifier<Id>(id: Id) -> Attribute<Id> {
        Attribute::Identifier(id)
    }

    pub fn name<Id>(name: impl Into<String>) -> Attribute<Id> {
        Attribute::Name(name.into())
    }

    pub fn label<Id>(label: impl Into<String>) -> Attribute<Id> {
        Attribute::Label(label.into())
    }

    pub fn placeholder<Id>(text: impl Into<String>) -> Attribute<Id> {
        Attribute::Placeholder(text.into())
    }

    pub fn hint<Id>(text: impl Into<String>) -> Attribute<Id> {
        Attribute::Hint(text.into())
    }

    pub fn required<Id>(required: bool) -> Attribute<Id> {
        Attribute::Required(required)
    }

    pub fn min<Id>(value: impl Into<Value>) -> Attribute<Id> {
        Attribute::Min(value.into())
    }

    pub fn max<Id>(value: impl Into<Value>) -> Attribute<Id> {
        Attribute::Max(value.into())
    }

    pub fn step<Id>(value: impl Into<Value>) -> Attribute<Id> {
        Attribute::Step(value.into())
    }

    pub fn value<Id>(value: impl Into<Value>) -> Attribute<Id> {
        Attribute::Value(value.into())
    }

    pub fn string_value<Id>(input: impl Into<String>) -> Attribute<Id> {
        Attribute::StringValue(input.into())
    }

    /// `(display text, value)` pairs, in display order.
    pub fn options<Id, S: Into<String>>(options: impl IntoIterator<Item = (S, Value)>) -> Attribute<Id> {
        Attribute::Options(
            options
                .into_iter()
                .map(|(text, value)| (text.into(), value))
                .collect(),
        )
    }

    /// Options whose value is their own display text.
    pub fn string_options<Id, S: Into<String>>(options: impl IntoIterator<Item = S>) -> Attribute<Id> {
        Attribute::Options(
            options
                .into_iter()
                .map(|text| {
                    let text = text.into();
                    let value = Value::Text(text.clone());
                    (text, value)
                })
                .collect(),
        )
    }

    /// Mask in `{d}`/`{D}`/`{w}`/`{W}` syntax.
    pub fn pattern<Id>(mask: &str) -> Attribute<Id> {
        Attribute::Pattern(Mask::parse(mask))
    }

    pub fn repeatable_min<Id>(min: usize) -> Attribute<Id> {
        Attribute::RepeatableMin(min)
    }

    pub fn repeatable_max<Id>(max: usize) -> Attribute<Id> {
        Attribute::RepeatableMax(Some(max))
    }

    pub fn add_button_copy<Id>(copy: impl Into<String>) -> Attribute<Id> {
        Attribute::AddButtonCopy(copy.into())
    }

    pub fn remove_button_copy<Id>(copy: impl Into<String>) -> Attribute<Id> {
        Attribute::RemoveButtonCopy(copy.into())
    }

    pub fn classes<Id, S: Into<String>>(classes: impl IntoIterator<Item = S>) -> Attribute<Id> {
        Attribute::Classes(classes.into_iter().map(Into::into).collect())
    }

    pub fn disabled<Id>(disabled: bool) -> Attribute<Id> {
        Attribute::Disabled(disabled)
    }

    pub fn hidden<Id>(hidden: bool) -> Attribute<Id> {
        Attribute::Hidden(hidden)
    }

    pub fn autocomplete<Id>(hint: impl Into<String>) -> Attribute<Id> {
        Attribute::Autocomplete(hint.into())
    }
}
