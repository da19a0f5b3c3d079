// Licensed under MIT. See LICENSE for details.

use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;
use nom::error::{ContextError, ErrorKind, ParseError};
use thiserror::Error;

// Something the parser was looking for when it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expected {
    Token(&'static str),
    Char(char),
    Rule(&'static str),
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Expected::Token(token) => write!(f, "'{}'", token),
            Expected::Char(c) => write!(f, "'{}'", c),
            Expected::Rule(name) => f.write_str(name),
            Expected::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// Malformed or incomplete formula. `offset` is the byte offset of the
/// farthest position the parser reached.
#[derive(Clone, Debug, Error, PartialEq)]
#[error(
    "syntax error at offset {offset}: expected {}, found {}",
    describe_expected(.expected),
    describe_found(.found)
)]
pub struct SyntaxError {
    pub offset: usize,
    pub expected: Vec<Expected>,
    pub found: Option<char>,
}

fn describe_expected(expected: &[Expected]) -> String {
    if expected.is_empty() {
        return "a valid formula".to_string();
    }
    expected.iter().join(" or ")
}

fn describe_found(found: &Option<char>) -> String {
    match *found {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    }
}

impl SyntaxError {
    pub(crate) fn at(input: &str, rest: &str, expected: Vec<Expected>) -> Self {
        let offset = input.len() - rest.len();
        SyntaxError {
            offset,
            expected: expected.into_iter().sorted().dedup().collect(),
            found: rest.trim_start().chars().next(),
        }
    }

    pub(crate) fn from_nom(input: &str, err: nom::Err<RuleError<'_>>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                SyntaxError::at(input, e.input, e.expected)
            }
            nom::Err::Incomplete(_) => SyntaxError::at(input, "", vec![Expected::EndOfInput]),
        }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[error("confidence {0} is outside [0, 1]")]
pub struct ConfidenceOutOfRange(pub f64);

/// A parameter binding with no literal form (NaN or an infinity).
#[derive(Clone, Debug, Error, PartialEq)]
#[error("parameter '{name}' bound to non-finite value {value}")]
pub struct NonFiniteBinding {
    pub name: String,
    pub value: f64,
}

// Error type threaded through the nom rules. Alternatives keep the farthest
// failure; failures at the same position pool what they expected.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleError<'a> {
    pub input: &'a str,
    pub expected: Vec<Expected>,
}

impl<'a> RuleError<'a> {
    pub fn expected(input: &'a str, what: Expected) -> Self {
        RuleError {
            input,
            expected: vec![what],
        }
    }
}

impl<'a> ParseError<&'a str> for RuleError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        RuleError {
            input,
            expected: vec![],
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: &'a str, c: char) -> Self {
        RuleError::expected(input, Expected::Char(c))
    }

    fn or(mut self, other: Self) -> Self {
        // Less input left means the failure happened farther in.
        match self.input.len().cmp(&other.input.len()) {
            Ordering::Less => self,
            Ordering::Greater => other,
            Ordering::Equal => {
                self.expected.extend(other.expected);
                self
            }
        }
    }
}

impl<'a> ContextError<&'a str> for RuleError<'a> {
    // A rule that failed where it started is reported by its name.
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        if other.input.len() == input.len() {
            other.expected = vec![Expected::Rule(ctx)];
        }
        other
    }
}
