#![forbid(unsafe_code)]

//! Host-side form state.
//!
//! [`Form`] owns a [`FieldTree`] and a [`FormConfig`] and exposes the
//! operations a host update loop needs: feed it events, decode it, move
//! values in and out as JSON.

use crate::FieldId;
use crate::attribute::Attribute;
use crate::config::FormConfig;
use crate::error::Error;
use crate::event::{FieldEvent, handle_event};
use crate::field::{FieldTree, touch_tree, update_with_id};
use crate::json::{encode, update_values_from_json};
use crate::parse::{ParseResult, Parser, parse, validate_and_parse};

/// A field tree together with its event-handling configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Form<Id> {
    tree: FieldTree<Id>,
    config: FormConfig,
}

impl<Id: FieldId> Form<Id> {
    #[must_use]
    pub fn new(tree: FieldTree<Id>) -> Self {
        Self {
            tree,
            config: FormConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn tree(&self) -> &FieldTree<Id> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut FieldTree<Id> {
        &mut self.tree
    }

    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    #[must_use]
    pub fn into_tree(self) -> FieldTree<Id> {
        self.tree
    }

    /// Apply a UI event. Returns `true` if the tree changed.
    pub fn handle_event(&mut self, event: &FieldEvent) -> bool {
        handle_event(&mut self.tree, event, &self.config)
    }

    /// Validate and decode, first touching every field when configured to.
    pub fn submit<T: 'static>(&mut self, parser: &Parser<Id, T>) -> ParseResult<Id, T> {
        if self.config.touch_on_submit {
            touch_tree(&mut self.tree);
        }
        validate_and_parse(parser, &mut self.tree)
    }

    /// Decode without validating.
    pub fn parse<T: 'static>(&mut self, parser: &Parser<Id, T>) -> ParseResult<Id, T> {
        parse(parser, &mut self.tree)
    }

    pub fn encode_json(&self) -> Result<serde_json::Value, Vec<Error<Id>>> {
        encode(&self.tree)
    }

    pub fn load_json(&mut self, json: &serde_json::Value) -> Result<(), Vec<Error<Id>>> {
        update_values_from_json(&mut self.tree, json)
    }

    /// Apply attributes to the field carrying `id`.
    pub fn update_with_id(
        &mut self,
        id: &Id,
        attributes: impl IntoIterator<Item = Attribute<Id>>,
    ) -> Result<(), Error<Id>> {
        update_with_id(&mut self.tree, id, attributes)
    }
}

impl<Id> From<FieldTree<Id>> for Form<Id>
where
    Id: FieldId,
{
    fn from(tree: FieldTree<Id>) -> Self {
        Self::new(tree)
    }
}
