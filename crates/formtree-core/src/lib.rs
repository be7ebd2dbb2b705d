#![forbid(unsafe_code)]

//! Field tree model, validation pipeline and decoder combinators.
//!
//! A form is a [`FieldTree`]: a [`Tree`](formtree_tree::Tree) of [`Field`]
//! nodes built with the [`construct`] functions and [`attr`] setters.
//! The host feeds UI events through [`handle_event`], checks fields with
//! [`validate_tree`], and reads a typed result with a [`Parser`] through
//! [`parse::parse`] or [`parse::validate_and_parse`].
//!
//! Everything here is synchronous and total: errors are values stored on
//! the nodes they concern and returned alongside, never panics.

use std::fmt;

pub mod attribute;
pub mod config;
pub mod construct;
pub mod error;
pub mod event;
pub mod field;
pub mod form;
pub mod json;
pub mod parse;
pub mod validate;
pub mod value;

pub use attribute::{Attribute, attr};
pub use config::FormConfig;
pub use error::{Error, union};
pub use event::{FieldEvent, handle_event};
pub use field::{Field, FieldTree, InputType, Status, find_path_by_id, touch_tree, update_with_id};
pub use form::Form;
pub use json::{encode, update_values_from_json};
pub use parse::{ParseResult, Parser};
pub use validate::{collect_errors, validate_node, validate_tree};
pub use value::{Opaque, Value};

/// Host-chosen field identifier.
///
/// Any cloneable, comparable, debuggable `'static` type qualifies: string
/// slices, an enum of field names, integers.
pub trait FieldId: Clone + PartialEq + fmt::Debug + 'static {}

impl<T: Clone + PartialEq + fmt::Debug + 'static> FieldId for T {}
