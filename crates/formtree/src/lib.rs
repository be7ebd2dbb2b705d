#![forbid(unsafe_code)]

//! formtree public facade crate.
//!
//! Re-exports the tree, mask and core crates under one roof and offers a
//! prelude for form definitions:
//!
//! ```
//! use formtree::prelude::*;
//!
//! let mut form = Form::new(construct::group::<&str>([], vec![
//!     construct::text([attr::identifier("email"), attr::name("email"), attr::required(true)]),
//! ]));
//! let changed = FieldEvent::Changed {
//!     path: vec![0],
//!     input: "ada@example.org".to_owned(),
//!     cursor: None,
//! };
//! assert!(form.handle_event(&changed));
//! assert_eq!(
//!     form.submit(&parse::field("email", parse::string())),
//!     Ok("ada@example.org".to_owned())
//! );
//! assert_eq!(form.encode_json(), Ok(serde_json::json!({"email": "ada@example.org"})));
//! ```

use std::fmt;

// --- Tree re-exports -------------------------------------------------------

pub use formtree_tree::{Path, Tree};

// --- Mask re-exports -------------------------------------------------------

pub use formtree_mask::{Formatted, Mask, MaskToken};

// --- Core re-exports -------------------------------------------------------

pub use formtree_core::{
    Attribute, Error, Field, FieldEvent, FieldId, FieldTree, Form, FormConfig, InputType, Opaque,
    ParseResult, Parser, Status, Value, attr, collect_errors, construct, encode, find_path_by_id,
    handle_event, parse, touch_tree, union, update_values_from_json, update_with_id,
    validate_node, validate_tree,
};

/// Every error from one failed decode or load, in node order.
#[derive(Debug, Clone, PartialEq)]
pub struct Errors<Id>(pub Vec<Error<Id>>);

impl<Id> Errors<Id> {
    #[must_use]
    pub fn as_slice(&self) -> &[Error<Id>] {
        &self.0
    }
}

impl<Id> From<Vec<Error<Id>>> for Errors<Id> {
    fn from(errors: Vec<Error<Id>>) -> Self {
        Self(errors)
    }
}

impl<Id: fmt::Debug> fmt::Display for Errors<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl<Id: fmt::Debug> std::error::Error for Errors<Id> {}

/// Standard result type for formtree APIs that can fail on several nodes.
pub type Result<T, Id> = std::result::Result<T, Errors<Id>>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Attribute, Error, Errors, Field, FieldEvent, FieldTree, Form, FormConfig, InputType, Mask,
        Parser, Status, Tree, Value, attr, construct, parse, validate_tree,
    };
    pub use crate::{core, mask, tree};
}

pub use formtree_core as core;
pub use formtree_mask as mask;
pub use formtree_tree as tree;
