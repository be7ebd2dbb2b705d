#![forbid(unsafe_code)]

//! Validation and decoding errors.
//!
//! Errors are values: they are stored on the node they concern and
//! returned to the caller, never raised. Every variant carries the
//! offending node's identifier, if it has one.

use std::fmt;

use crate::value::Value;

/// An error attached to a field or produced while decoding a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Error<Id> {
    /// A required field holds no value.
    IsBlank(Option<Id>),
    /// The value is below the configured minimum.
    ValueTooSmall {
        id: Option<Id>,
        value: Value,
        min: Value,
    },
    /// The value is above the configured maximum.
    ValueTooLarge {
        id: Option<Id>,
        value: Value,
        max: Value,
    },
    /// Both bounds are configured and the value lies outside them.
    ValueNotInRange {
        id: Option<Id>,
        value: Value,
        min: Value,
        max: Value,
    },
    /// A choice field has nothing to choose from.
    NoOptionsProvided(Option<Id>),
    /// An email field does not hold an address.
    EmailInvalid(Option<Id>),
    /// The value does not fill its mask.
    PatternError(Option<Id>),
    /// The value could not be decoded as requested.
    ParseError(Option<Id>),
    /// A scalar was requested from a group or repeatable.
    IsGroupNotInput(Option<Id>),
    /// A repeatable without a name cannot be encoded.
    RepeatableHasNoName(Option<Id>),
    /// No node carries the requested identifier.
    InputNotFound(Id),
    /// Host-supplied failure reason.
    CustomError(Option<Id>, String),
    /// Several errors on one node.
    ErrorList(Option<Id>, Vec<Error<Id>>),
}

impl<Id: Clone + PartialEq> Error<Id> {
    /// The identifier of the node this error concerns.
    #[must_use]
    pub fn identifier(&self) -> Option<&Id> {
        match self {
            Self::IsBlank(id)
            | Self::NoOptionsProvided(id)
            | Self::EmailInvalid(id)
            | Self::PatternError(id)
            | Self::ParseError(id)
            | Self::IsGroupNotInput(id)
            | Self::RepeatableHasNoName(id)
            | Self::CustomError(id, _)
            | Self::ErrorList(id, _)
            | Self::ValueTooSmall { id, .. }
            | Self::ValueTooLarge { id, .. }
            | Self::ValueNotInRange { id, .. } => id.as_ref(),
            Self::InputNotFound(id) => Some(id),
        }
    }

    /// The inner errors of an `ErrorList`, or the error itself.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::ErrorList(_, errors) => errors,
            other => vec![other],
        }
    }

    /// Merge two errors on the same node.
    ///
    /// Inner errors are flattened and de-duplicated; a single survivor is
    /// returned as-is, so combining an error with itself is a no-op.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        let id = self.identifier().cloned();
        let mut errors = Vec::new();
        for error in self.flatten().into_iter().chain(other.flatten()) {
            push_unique(&mut errors, error);
        }
        if errors.len() == 1 {
            errors.swap_remove(0)
        } else {
            Self::ErrorList(id, errors)
        }
    }

    /// Fold any number of same-node errors into one.
    pub fn combine_all(errors: impl IntoIterator<Item = Self>) -> Option<Self> {
        errors.into_iter().reduce(Self::combine)
    }

    /// Whether this error is shown regardless of interaction status.
    #[must_use]
    pub fn is_always_visible(&self) -> bool {
        match self {
            Self::ValueTooSmall { .. }
            | Self::ValueTooLarge { .. }
            | Self::ValueNotInRange { .. }
            | Self::PatternError(_)
            | Self::NoOptionsProvided(_) => true,
            Self::ErrorList(_, errors) => errors.iter().any(Self::is_always_visible),
            _ => false,
        }
    }
}

/// Append `error` unless a structurally equal error is already present.
pub fn push_unique<Id: PartialEq>(errors: &mut Vec<Error<Id>>, error: Error<Id>) {
    if !errors.contains(&error) {
        errors.push(error);
    }
}

/// Concatenate two error lists, keeping the first occurrence of each.
#[must_use]
pub fn union<Id: PartialEq>(mut first: Vec<Error<Id>>, second: Vec<Error<Id>>) -> Vec<Error<Id>> {
    for error in second {
        push_unique(&mut first, error);
    }
    first
}

fn value_text(value: &Value) -> String {
    value.to_string().unwrap_or_else(|| format!("{value:?}"))
}

impl<Id: fmt::Debug> Error<Id> {
    /// The message without the identifier prefix.
    fn write_message(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsBlank(_) => f.write_str("this field is required"),
            Self::ValueTooSmall { value, min, .. } => {
                write!(f, "{} is smaller than {}", value_text(value), value_text(min))
            }
            Self::ValueTooLarge { value, max, .. } => {
                write!(f, "{} is larger than {}", value_text(value), value_text(max))
            }
            Self::ValueNotInRange { value, min, max, .. } => write!(
                f,
                "{} is not between {} and {}",
                value_text(value),
                value_text(min),
                value_text(max)
            ),
            Self::NoOptionsProvided(_) => f.write_str("no options provided"),
            Self::EmailInvalid(_) => f.write_str("invalid email address"),
            Self::PatternError(_) => f.write_str("value does not match the pattern"),
            Self::ParseError(_) => f.write_str("could not parse value"),
            Self::IsGroupNotInput(_) => f.write_str("is a group, not an input"),
            Self::RepeatableHasNoName(_) => f.write_str("repeatable has no name"),
            Self::InputNotFound(id) => write!(f, "no input with identifier {id:?}"),
            Self::CustomError(_, message) => f.write_str(message),
            Self::ErrorList(_, errors) => {
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    error.write_message(f)?;
                }
                Ok(())
            }
        }
    }
}

impl<Id: fmt::Debug> fmt::Display for Error<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Self::InputNotFound(_) => None,
            Self::IsBlank(id)
            | Self::NoOptionsProvided(id)
            | Self::EmailInvalid(id)
            | Self::PatternError(id)
            | Self::ParseError(id)
            | Self::IsGroupNotInput(id)
            | Self::RepeatableHasNoName(id)
            | Self::CustomError(id, _)
            | Self::ErrorList(id, _)
            | Self::ValueTooSmall { id, .. }
            | Self::ValueTooLarge { id, .. }
            | Self::ValueNotInRange { id, .. } => id.as_ref(),
        };
        if let Some(id) = id {
            write!(f, "{id:?}: ")?;
        }
        self.write_message(f)
    }
}

impl<Id: fmt::Debug> std::error::Error for Error<Id> {}
