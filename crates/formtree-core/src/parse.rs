#![forbid(unsafe_code)]

//! Decoder combinators.
//!
//! A [`Parser`] reads a typed value out of a [`FieldTree`], editing the
//! tree in place as it goes (mask reformatting, [`format`] rewrites and
//! decode-error annotations stay visible to the caller even on failure).
//!
//! Composition comes in two flavours:
//!
//! - [`map2`], [`map3`] and [`Parser::and_map`] run every side and union
//!   their errors, so a form with two bad fields reports both.
//! - [`Parser::and_then`] stops at the first failure.
//!
//! ```
//! use formtree_core::{attr, construct, parse};
//!
//! let mut form = construct::group::<&str>([], vec![
//!     construct::text([attr::identifier("name"), attr::value("Ada")]),
//!     construct::int([attr::identifier("age"), attr::value(36i64)]),
//! ]);
//! let person = parse::map2(
//!     parse::field("name", parse::string()),
//!     parse::field("age", parse::int()),
//!     |name, age| format!("{name} ({age})"),
//! );
//! assert_eq!(parse::parse(&person, &mut form), Ok("Ada (36)".to_owned()));
//! ```

use time::OffsetDateTime;

use crate::FieldId;
use crate::error::{Error, union};
use crate::field::{Field, FieldTree, find_path_by_id};
use crate::validate::{collect_errors, validate_tree};
use crate::value::Value;

/// Errors from a decode attempt: non-empty, in node order, no duplicates.
pub type ParseResult<Id, T> = Result<T, Vec<Error<Id>>>;

/// Whether node errors from a preceding validation pass gate decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Decode values as they are.
    Extract,
    /// Fail with a node's own errors before decoding it, and record decode
    /// failures on the node.
    Validated,
}

type RunFn<Id, T> = dyn Fn(&mut FieldTree<Id>, Mode) -> ParseResult<Id, T>;

/// A decoder from a field tree to `T`.
pub struct Parser<Id, T> {
    run: Box<RunFn<Id, T>>,
}

impl<Id: FieldId, T: 'static> Parser<Id, T> {
    fn new(run: impl Fn(&mut FieldTree<Id>, Mode) -> ParseResult<Id, T> + 'static) -> Self {
        Self { run: Box::new(run) }
    }

    /// Run against `tree` (the node the parser is positioned on).
    pub fn run(&self, tree: &mut FieldTree<Id>, mode: Mode) -> ParseResult<Id, T> {
        (self.run)(tree, mode)
    }

    #[must_use]
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Parser<Id, U> {
        Parser::new(move |tree, mode| self.run(tree, mode).map(&f))
    }

    /// Feed the result into `f` and run the parser it returns. Does not
    /// run `f` when `self` fails.
    #[must_use]
    pub fn and_then<U: 'static>(self, f: impl Fn(T) -> Parser<Id, U> + 'static) -> Parser<Id, U> {
        Parser::new(move |tree, mode| {
            let value = self.run(tree, mode)?;
            f(value).run(tree, mode)
        })
    }

    /// Apply a parsed function to a parsed argument; both sides always run.
    #[must_use]
    pub fn and_map<A: 'static, B: 'static>(self, argument: Parser<Id, A>) -> Parser<Id, B>
    where
        T: FnOnce(A) -> B,
    {
        map2(self, argument, |f, a| f(a))
    }

    /// Rewrite the tree with `f` after a successful parse.
    #[must_use]
    pub fn and_update(self, f: impl Fn(&mut FieldTree<Id>, &T) + 'static) -> Self {
        Parser::new(move |tree, mode| {
            let value = self.run(tree, mode)?;
            f(tree, &value);
            Ok(value)
        })
    }
}

impl<Id, T> std::fmt::Debug for Parser<Id, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Parser(..)")
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// Decode the current node's own value.
///
/// Containers fail with `IsGroupNotInput`. In validated mode a node that
/// already has errors fails with them, and a decode failure is recorded
/// on the node.
fn scalar<Id: FieldId, T>(
    tree: &mut FieldTree<Id>,
    mode: Mode,
    decode: impl FnOnce(&Field<Id>) -> Result<T, Error<Id>>,
) -> ParseResult<Id, T> {
    let field = tree.value_mut();
    if field.is_container() {
        return Err(vec![Error::IsGroupNotInput(field.identifier().cloned())]);
    }
    if mode == Mode::Validated
        && let Some(error) = field.combined_error()
    {
        return Err(vec![error]);
    }
    decode(&*field).map_err(|error| {
        if mode == Mode::Validated {
            field.add_error(error.clone());
        }
        vec![error]
    })
}

fn project<Id: FieldId, T>(field: &Field<Id>, f: impl FnOnce(&Value) -> Option<T>) -> Result<T, Error<Id>> {
    f(field.value()).ok_or_else(|| Error::ParseError(field.identifier().cloned()))
}

/// The value's string form.
#[must_use]
pub fn string<Id: FieldId>() -> Parser<Id, String> {
    Parser::new(|tree, mode| scalar(tree, mode, |field| project(field, Value::to_string)))
}

#[must_use]
pub fn int<Id: FieldId>() -> Parser<Id, i64> {
    Parser::new(|tree, mode| scalar(tree, mode, |field| project(field, Value::to_int)))
}

/// Floats, and integers widened to floats.
#[must_use]
pub fn float<Id: FieldId>() -> Parser<Id, f64> {
    Parser::new(|tree, mode| {
        scalar(tree, mode, |field| {
            project(field, |value| {
                value
                    .to_float()
                    .or_else(|| value.to_int().map(|i| i as f64))
            })
        })
    })
}

#[must_use]
pub fn bool<Id: FieldId>() -> Parser<Id, bool> {
    Parser::new(|tree, mode| scalar(tree, mode, |field| project(field, Value::to_bool)))
}

/// The instant behind a month, date or datetime field.
#[must_use]
pub fn posix<Id: FieldId>() -> Parser<Id, OffsetDateTime> {
    Parser::new(|tree, mode| scalar(tree, mode, |field| project(field, Value::to_posix)))
}

/// The raw value, `Blank` included.
#[must_use]
pub fn value<Id: FieldId>() -> Parser<Id, Value> {
    Parser::new(|tree, mode| scalar(tree, mode, |field| Ok(field.value().clone())))
}

/// Host decoding of the value. An `Err` message becomes a `CustomError`.
#[must_use]
pub fn custom<Id: FieldId, T: 'static>(
    f: impl Fn(&Value) -> Result<T, String> + 'static,
) -> Parser<Id, T> {
    Parser::new(move |tree, mode| {
        scalar(tree, mode, |field| {
            f(field.value()).map_err(|message| Error::CustomError(field.identifier().cloned(), message))
        })
    })
}

/// Rewrite the field's text with `f`, store it back, then decode it as a
/// string.
#[must_use]
pub fn format<Id: FieldId>(f: impl Fn(&str) -> String + 'static) -> Parser<Id, String> {
    Parser::new(move |tree, mode| {
        let field = tree.value_mut();
        if !field.is_container() {
            let current = field.value().to_string().unwrap_or_default();
            let rewritten = field.input_string_to_value(&f(&current));
            field.set_value(rewritten);
        }
        scalar(tree, mode, |field| project(field, Value::to_string))
    })
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

/// Run `inner` on the first node (pre-order) whose identifier is `id`.
#[must_use]
pub fn field<Id: FieldId, T: 'static>(id: Id, inner: Parser<Id, T>) -> Parser<Id, T> {
    Parser::new(move |tree, mode| {
        let Some(path) = find_path_by_id(tree, &id) else {
            tracing::debug!(identifier = ?id, "field: no such identifier");
            return Err(vec![Error::InputNotFound(id.clone())]);
        };
        match tree.get_mut(&path) {
            Some(node) => inner.run(node, mode),
            None => Err(vec![Error::InputNotFound(id.clone())]),
        }
    })
}

/// `None` for a blank node, otherwise `inner`'s result.
#[must_use]
pub fn maybe<Id: FieldId, T: 'static>(inner: Parser<Id, T>) -> Parser<Id, Option<T>> {
    Parser::new(move |tree, mode| {
        let field = tree.value();
        if field.is_blank() {
            return match field.combined_error() {
                Some(error) if mode == Mode::Validated => Err(vec![error]),
                _ => Ok(None),
            };
        }
        inner.run(tree, mode).map(Some)
    })
}

/// Run `inner` on every child. Every child is visited even after a
/// failure, and all failures are unioned.
#[must_use]
pub fn list<Id: FieldId, T: 'static>(inner: Parser<Id, T>) -> Parser<Id, Vec<T>> {
    Parser::new(move |tree, mode| {
        let mut values = Vec::with_capacity(tree.children().len());
        let mut errors = Vec::new();
        for child in tree.children_mut() {
            match inner.run(child, mode) {
                Ok(value) => values.push(value),
                Err(failed) => errors = union(errors, failed),
            }
        }
        if errors.is_empty() { Ok(values) } else { Err(errors) }
    })
}

/// The subtree's JSON encoding.
#[must_use]
pub fn json<Id: FieldId>() -> Parser<Id, serde_json::Value> {
    Parser::new(|tree, mode| {
        if mode == Mode::Validated {
            let errors = collect_errors(tree);
            if !errors.is_empty() {
                return Err(errors);
            }
        }
        crate::json::encode(tree)
    })
}

// ---------------------------------------------------------------------------
// Constants and alternatives
// ---------------------------------------------------------------------------

/// Always succeeds with `value`, leaving the tree alone.
#[must_use]
pub fn succeed<Id: FieldId, T: Clone + 'static>(value: T) -> Parser<Id, T> {
    Parser::new(move |_, _| Ok(value.clone()))
}

/// Always fails with a `CustomError` on the current node.
#[must_use]
pub fn fail<Id: FieldId, T: 'static>(message: impl Into<String>) -> Parser<Id, T> {
    let message = message.into();
    Parser::new(move |tree, _| {
        Err(vec![Error::CustomError(
            tree.value().identifier().cloned(),
            message.clone(),
        )])
    })
}

/// The first parser that succeeds; the union of all errors otherwise.
#[must_use]
pub fn one_of<Id: FieldId, T: 'static>(parsers: Vec<Parser<Id, T>>) -> Parser<Id, T> {
    Parser::new(move |tree, mode| {
        let mut errors = Vec::new();
        for parser in &parsers {
            match parser.run(tree, mode) {
                Ok(value) => return Ok(value),
                Err(failed) => errors = union(errors, failed),
            }
        }
        Err(errors)
    })
}

// ---------------------------------------------------------------------------
// Applicative composition
// ---------------------------------------------------------------------------

/// Combine two parsers. Both run; errors from both sides are unioned.
#[must_use]
pub fn map2<Id: FieldId, A: 'static, B: 'static, C: 'static>(
    a: Parser<Id, A>,
    b: Parser<Id, B>,
    f: impl Fn(A, B) -> C + 'static,
) -> Parser<Id, C> {
    Parser::new(move |tree, mode| {
        let ra = a.run(tree, mode);
        let rb = b.run(tree, mode);
        match (ra, rb) {
            (Ok(a), Ok(b)) => Ok(f(a, b)),
            (Err(ea), Err(eb)) => Err(union(ea, eb)),
            (Err(errors), Ok(_)) | (Ok(_), Err(errors)) => Err(errors),
        }
    })
}

/// Combine three parsers, in the manner of [`map2`].
#[must_use]
pub fn map3<Id: FieldId, A: 'static, B: 'static, C: 'static, D: 'static>(
    a: Parser<Id, A>,
    b: Parser<Id, B>,
    c: Parser<Id, C>,
    f: impl Fn(A, B, C) -> D + 'static,
) -> Parser<Id, D> {
    map2(map2(a, b, |a, b| (a, b)), c, move |(a, b), c| f(a, b, c))
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Decode without validating.
pub fn parse<Id: FieldId, T: 'static>(parser: &Parser<Id, T>, tree: &mut FieldTree<Id>) -> ParseResult<Id, T> {
    parser.run(tree, Mode::Extract)
}

/// Validate the tree, then decode.
///
/// Nodes read by `parser` that failed validation make the decode fail
/// with their errors. On failure the result lists every annotated node in
/// tree order, validation and decode failures alike, followed by decode
/// errors that belong to no visible node (such as `InputNotFound`). The
/// tree keeps the fresh annotations either way.
pub fn validate_and_parse<Id: FieldId, T: 'static>(
    parser: &Parser<Id, T>,
    tree: &mut FieldTree<Id>,
) -> ParseResult<Id, T> {
    let _span = tracing::debug_span!("validate_and_parse", nodes = tree.size()).entered();
    // Annotations are read back after decoding.
    validate_tree(tree).ok();
    match parser.run(tree, Mode::Validated) {
        Ok(value) => Ok(value),
        Err(decode) => {
            let errors = union(collect_errors(tree), decode);
            tracing::debug!(error_count = errors.len(), "decode failed");
            Err(errors)
        }
    }
}
