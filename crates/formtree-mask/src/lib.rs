#![forbid(unsafe_code)]

//! Cursor-aware input masks.
//!
//! A mask is a sequence of tokens written inline with literal characters:
//!
//! | Syntax | Token | Accepts |
//! |--------|-------|---------|
//! | `{d}` | [`MaskToken::Digit`] | `0-9` |
//! | `{D}` | [`MaskToken::NonDigit`] | anything but `0-9` |
//! | `{w}` | [`MaskToken::WordChar`] | `A-Z`, `a-z`, `0-9`, `_` |
//! | `{W}` | [`MaskToken::NonWordChar`] | anything else |
//! | other | [`MaskToken::Literal`] | that exact character |
//!
//! [`format`] walks mask and input together. Input characters the current
//! token rejects are dropped; separators are filled in automatically when
//! the input skips over them. The result reports whether every token of
//! the mask was filled, which is what pattern validation checks.
//!
//! # Example
//!
//! ```
//! use formtree_mask::{Mask, format};
//!
//! let card = Mask::parse("{d}{d}{d}{d} {d}{d}{d}{d}");
//! let out = format(&card, "12345678", 8);
//! assert_eq!(out.formatted, "1234 5678");
//! assert!(out.consumed);
//!
//! let partial = format(&card, "12345", 5);
//! assert_eq!(partial.formatted, "1234 5");
//! assert!(!partial.consumed);
//! ```

use std::fmt;

/// One position of a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskToken {
    /// `{d}`: an ASCII digit.
    Digit,
    /// `{D}`: any character that is not an ASCII digit.
    NonDigit,
    /// `{w}`: an ASCII letter, digit or underscore.
    WordChar,
    /// `{W}`: any character that `{w}` rejects.
    NonWordChar,
    /// A fixed character.
    Literal(char),
}

impl MaskToken {
    /// Whether `c` satisfies this token as typed.
    #[must_use]
    pub fn accepts(self, c: char) -> bool {
        match self {
            Self::Digit => c.is_ascii_digit(),
            Self::NonDigit => !c.is_ascii_digit(),
            Self::WordChar => is_word_char(c),
            Self::NonWordChar => !is_word_char(c),
            Self::Literal(lit) => lit == c,
        }
    }

    /// Whether this token is a fixed character.
    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A parsed mask.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    tokens: Vec<MaskToken>,
}

impl Mask {
    /// Parse mask syntax. Unknown `{x}` sequences are taken literally.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut tokens = Vec::with_capacity(chars.len());
        let mut i = 0;
        while i < chars.len() {
            let placeholder = match chars.get(i..i + 3) {
                Some(['{', 'd', '}']) => Some(MaskToken::Digit),
                Some(['{', 'D', '}']) => Some(MaskToken::NonDigit),
                Some(['{', 'w', '}']) => Some(MaskToken::WordChar),
                Some(['{', 'W', '}']) => Some(MaskToken::NonWordChar),
                _ => None,
            };
            match placeholder {
                Some(token) => {
                    tokens.push(token);
                    i += 3;
                }
                None => {
                    tokens.push(MaskToken::Literal(chars[i]));
                    i += 1;
                }
            }
        }
        Self { tokens }
    }

    /// Build a mask from tokens.
    #[must_use]
    pub fn from_tokens(tokens: Vec<MaskToken>) -> Self {
        Self { tokens }
    }

    /// The mask tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    /// Number of tokens (the length of a completely filled value).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the mask has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<&str> for Mask {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                MaskToken::Digit => f.write_str("{d}")?,
                MaskToken::NonDigit => f.write_str("{D}")?,
                MaskToken::WordChar => f.write_str("{w}")?,
                MaskToken::NonWordChar => f.write_str("{W}")?,
                MaskToken::Literal(c) => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}

/// Output of [`format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    /// The reformatted input.
    pub formatted: String,
    /// Caret offset (in characters) within `formatted`.
    pub cursor: usize,
    /// Whether every token of the mask was filled.
    pub consumed: bool,
}

/// Reformat `input` against `mask`, carrying the caret at `cursor`
/// (a character offset into `input`) over to the formatted text.
#[must_use]
pub fn format(mask: &Mask, input: &str, cursor: usize) -> Formatted {
    let chars: Vec<char> = input.chars().collect();
    let (formatted, consumed) = apply(mask.tokens(), &chars);
    let cursor = if cursor >= chars.len() {
        formatted.chars().count()
    } else {
        apply(mask.tokens(), &chars[..cursor]).0.chars().count()
    };
    Formatted {
        formatted,
        cursor,
        consumed,
    }
}

fn apply(tokens: &[MaskToken], input: &[char]) -> (String, bool) {
    let mut out = String::with_capacity(tokens.len());
    let (mut t, mut i) = (0, 0);

    while let Some(&token) = tokens.get(t) {
        // A trailing separator is never emitted without input after it.
        let Some(&c) = input.get(i) else {
            return (out, false);
        };

        if token.accepts(c) {
            out.push(c);
            t += 1;
            i += 1;
            continue;
        }

        if token.is_literal()
            && let Some(end) = literal_run_accepting(tokens, t, c)
        {
            out.extend(tokens[t..end].iter().filter_map(|tok| match tok {
                MaskToken::Literal(lit) => Some(*lit),
                _ => None,
            }));
            t = end;
            continue;
        }

        i += 1;
    }

    (out, true)
}

/// Index of the first token past the literal run starting at `start`,
/// provided that token accepts `c`.
fn literal_run_accepting(tokens: &[MaskToken], start: usize, c: char) -> Option<usize> {
    let end = tokens[start..]
        .iter()
        .position(|tok| !tok.is_literal())
        .map_or(tokens.len(), |offset| start + offset);
    tokens.get(end).filter(|tok| tok.accepts(c)).map(|_| end)
}
