#![forbid(unsafe_code)]

//! Runtime field values and string coercion.
//!
//! [`Value::Blank`] and [`Value::Invalid`] are distinct states: `Blank`
//! means nothing usable was entered (which validation may accept), while
//! `Invalid` means something was entered that could not be coerced.
//! Malformed numeric and date input coerces to `Blank`.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// A host-defined payload carried by [`Value::Custom`].
///
/// Two `Opaque`s are equal only if they share the same allocation, so a
/// value picked from an option list compares equal to that option.
#[derive(Clone)]
pub struct Opaque(Arc<dyn Any + Send + Sync>);

impl Opaque {
    /// Wrap a host value.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the payload as `T`, if that is its type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opaque(..)")
    }
}

/// The value held by a field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    /// First instant of a calendar month (UTC).
    Month(OffsetDateTime),
    /// Midnight of a calendar day (UTC).
    Date(OffsetDateTime),
    Time(OffsetDateTime),
    Boolean(bool),
    Custom(Opaque),
    /// Nothing entered.
    #[default]
    Blank,
    /// Something entered that could not be coerced.
    Invalid,
}

impl Value {
    /// Wrap a host value as [`Value::Custom`].
    #[must_use]
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Opaque::new(value))
    }

    // -------------------------------------------------------------------------
    // Coercion from raw input
    // -------------------------------------------------------------------------

    /// Text as typed; empty or whitespace-only input is `Blank`.
    #[must_use]
    pub fn from_string(input: &str) -> Self {
        if input.trim().is_empty() {
            Self::Blank
        } else {
            Self::Text(input.to_owned())
        }
    }

    /// Trimmed text; empty or whitespace-only input is `Blank`.
    #[must_use]
    pub fn from_non_blank_string(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Self::Blank
        } else {
            Self::Text(trimmed.to_owned())
        }
    }

    /// Integer input; anything unparsable is `Blank`.
    #[must_use]
    pub fn int_from_string(input: &str) -> Self {
        input
            .trim()
            .parse::<i64>()
            .map_or(Self::Blank, Self::Integer)
    }

    /// Finite float input; anything unparsable is `Blank`.
    #[must_use]
    pub fn float_from_string(input: &str) -> Self {
        match input.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Self::Float(f),
            _ => Self::Blank,
        }
    }

    /// `YYYY-MM` (longer ISO dates are sliced); malformed input is `Blank`.
    #[must_use]
    pub fn month_from_string(input: &str) -> Self {
        parse_month(input.trim()).map_or(Self::Blank, Self::Month)
    }

    /// `YYYY-MM-DD` (longer ISO strings are sliced); malformed input is `Blank`.
    #[must_use]
    pub fn date_from_string(input: &str) -> Self {
        input
            .trim()
            .get(..10)
            .and_then(|s| Date::parse(s, format_description!("[year]-[month]-[day]")).ok())
            .map_or(Self::Blank, |date| Self::Date(date.midnight().assume_utc()))
    }

    /// RFC 3339 timestamps, or local `YYYY-MM-DDTHH:MM[:SS]` read as UTC.
    #[must_use]
    pub fn time_from_string(input: &str) -> Self {
        parse_time(input.trim()).map_or(Self::Blank, Self::Time)
    }

    // -------------------------------------------------------------------------
    // Projections
    // -------------------------------------------------------------------------

    /// String form, for every variant that has one.
    ///
    /// Months render as `YYYY-MM`, dates as `YYYY-MM-DD` and times as full
    /// ISO 8601 in UTC with milliseconds.
    #[must_use]
    pub fn to_string(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Month(t) => utc(*t).format(format_description!("[year]-[month]")).ok(),
            Self::Date(t) => utc(*t)
                .format(format_description!("[year]-[month]-[day]"))
                .ok(),
            Self::Time(t) => utc(*t)
                .format(format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
                ))
                .ok(),
            Self::Boolean(b) => Some(b.to_string()),
            Self::Custom(_) | Self::Blank | Self::Invalid => None,
        }
    }

    /// The integer held by `Integer`.
    #[must_use]
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The float held by `Float`. Integers are not widened.
    #[must_use]
    pub fn to_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The flag held by `Boolean`.
    #[must_use]
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The instant behind a month, date or time.
    #[must_use]
    pub fn to_posix(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Month(t) | Self::Date(t) | Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Borrow a custom payload as `T`.
    #[must_use]
    pub fn to_custom<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(opaque) => opaque.downcast_ref(),
            _ => None,
        }
    }

    /// Whether nothing was entered.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Whether the entry could not be coerced.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    // -------------------------------------------------------------------------
    // Ordering and encoding
    // -------------------------------------------------------------------------

    /// Numeric projection used for ordering: numbers as themselves,
    /// time-like values as epoch milliseconds.
    fn numeric(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Month(t) | Self::Date(t) | Self::Time(t) => {
                Some((t.unix_timestamp_nanos() / 1_000_000) as f64)
            }
            _ => None,
        }
    }

    /// Order two values by their numeric projection. `None` when either
    /// side has no projection.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        self.numeric()?.partial_cmp(&other.numeric()?)
    }

    /// JSON form: numbers and booleans natively, `Blank` as null, all
    /// else through [`Value::to_string`] (null when that has no answer).
    #[must_use]
    pub fn encode(&self) -> serde_json::Value {
        match self {
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Value::from(*f),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Blank => serde_json::Value::Null,
            other => other
                .to_string()
                .map_or(serde_json::Value::Null, serde_json::Value::String),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

fn utc(t: OffsetDateTime) -> OffsetDateTime {
    t.to_offset(UtcOffset::UTC)
}

fn parse_month(input: &str) -> Option<OffsetDateTime> {
    let slice = input.get(..7)?;
    let (year, month) = slice.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month = time::Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let date = Date::from_calendar_date(year, month, 1).ok()?;
    Some(date.midnight().assume_utc())
}

fn parse_time(input: &str) -> Option<OffsetDateTime> {
    if let Ok(t) = OffsetDateTime::parse(input, &Rfc3339) {
        return Some(t);
    }
    PrimitiveDateTime::parse(
        input,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            input,
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        )
    })
    .ok()
    .map(PrimitiveDateTime::assume_utc)
}
