use std::fmt::Display;

use log::trace;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_till1, take_while},
    character::complete::char,
    combinator::rest,
    sequence::{preceded, separated_pair},
    IResult, Parser,
};
use serde::{Deserialize, Serialize};

use crate::{
    config::protocol::TokenizerConfig,
    core::types::{DelimiterSet, DuplicatePolicy, Record, PAIR_SEPARATOR},
};

/// What to do with a field that carries no `=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeylessPolicy {
    #[default]
    Skip,
    /// Store under `_0`, `_1`, ... numbered from the start of each line.
    Capture,
}

impl Display for KeylessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeylessPolicy::Skip => write!(f, "skip"),
            KeylessPolicy::Capture => write!(f, "capture"),
        }
    }
}

/// One field of a line, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    Pair(&'a str, &'a str),
    Keyless(&'a str),
    /// Has a separator but nothing usable as a key, e.g. `=5`.
    Malformed(&'a str),
}

impl<'a> Field<'a> {
    /// The key of a pair, or the token itself for a keyless field.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Field::Pair(key, _) => Some(key),
            Field::Keyless(token) => Some(token),
            Field::Malformed(_) => None,
        }
    }
}

fn is_line_end(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Everything up to (not including) the line terminator.
fn line_body(input: &str) -> IResult<&str, &str> {
    take_till(is_line_end).parse(input)
}

/// One `\r\n`, `\n` or lone `\r`.
fn line_end(input: &str) -> IResult<&str, &str> {
    alt((tag("\r\n"), tag("\n"), tag("\r"))).parse(input)
}

fn skip_line_end(input: &str) -> &str {
    match line_end(input) {
        Ok((remaining, _)) => remaining,
        Err(_) => input,
    }
}

/// Iterator over line bodies. `\r\n`, `\n` and a lone `\r` each end a line.
pub struct Lines<'a> {
    input: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.input.is_empty() {
            return None;
        }

        let (remaining, body) = line_body(self.input).ok()?;
        self.input = skip_line_end(remaining);
        Some(body)
    }
}

/// Splits `input` the same way [`Tokenizer::parse_line`] finds line ends.
pub fn lines(input: &str) -> Lines<'_> {
    Lines { input }
}

/// Skips leading delimiters and takes the next non-empty run.
pub(super) fn next_field<'a>(input: &'a str, delimiters: &DelimiterSet) -> IResult<&'a str, &'a str> {
    preceded(
        take_while(|c: char| delimiters.contains(c)),
        take_till1(|c: char| delimiters.contains(c)),
    )
    .parse(input)
}

fn key_value(field: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_till1(|c: char| c == PAIR_SEPARATOR),
        char(PAIR_SEPARATOR),
        rest,
    )
    .parse(field)
}

fn classify(field: &str) -> Field<'_> {
    if !field.contains(PAIR_SEPARATOR) {
        return Field::Keyless(field);
    }

    match key_value(field) {
        Ok((_, (key, value))) if !key.trim().is_empty() => Field::Pair(key.trim(), value.trim()),
        _ => Field::Malformed(field),
    }
}

/// Iterator over the fields of one line body.
pub struct Fields<'a, 'd> {
    input: &'a str,
    delimiters: &'d DelimiterSet,
}

impl<'a, 'd> Iterator for Fields<'a, 'd> {
    type Item = Field<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (remaining, raw) = next_field(self.input, self.delimiters).ok()?;
            self.input = remaining;

            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(classify(trimmed));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    delimiters: DelimiterSet,
    duplicates: DuplicatePolicy,
    keyless: KeylessPolicy,
}

impl Tokenizer {
    pub fn new(delimiters: DelimiterSet) -> Self {
        Self {
            delimiters,
            duplicates: DuplicatePolicy::default(),
            keyless: KeylessPolicy::default(),
        }
    }

    pub fn from_config(cfg: &TokenizerConfig) -> Self {
        Self {
            delimiters: cfg.delimiters.clone(),
            duplicates: cfg.duplicates,
            keyless: cfg.keyless,
        }
    }

    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn with_keyless(mut self, policy: KeylessPolicy) -> Self {
        self.keyless = policy;
        self
    }

    /// Splits a single line body (no terminator handling) into fields.
    pub fn fields<'a, 'd>(&'d self, body: &'a str) -> Fields<'a, 'd> {
        Fields {
            input: body,
            delimiters: &self.delimiters,
        }
    }

    /// Parses the first line of `input` into `record` and returns the rest,
    /// starting at the line terminator. `record` is not cleared, so repeated
    /// calls accumulate.
    pub fn parse_line<'a>(&self, input: &'a str, record: &mut Record) -> &'a str {
        let (remaining, body) = match line_body(input) {
            Ok(parsed) => parsed,
            Err(_) => return input,
        };

        let mut keyless_index = 0usize;
        for field in self.fields(body) {
            match field {
                Field::Pair(key, value) => {
                    if !record.insert(key, value, self.duplicates) {
                        trace!("Kept earlier value for duplicate key {}", key);
                    }
                }
                Field::Keyless(token) => match self.keyless {
                    KeylessPolicy::Skip => trace!("Skipping keyless field {:?}", token),
                    KeylessPolicy::Capture => {
                        record.insert(format!("_{}", keyless_index), token, self.duplicates);
                        keyless_index += 1;
                    }
                },
                Field::Malformed(raw) => trace!("Skipping malformed field {:?}", raw),
            }
        }

        remaining
    }

    /// Accumulates every line of `input` into `record`.
    pub fn parse_text(&self, input: &str, record: &mut Record) {
        let mut rest = input;
        while !rest.is_empty() {
            rest = skip_line_end(self.parse_line(rest, record));
        }
    }
}

/// Parses one line with the default policies. See [`Tokenizer::parse_line`].
pub fn parse_line<'a>(input: &'a str, delimiters: &DelimiterSet, record: &mut Record) -> &'a str {
    Tokenizer::new(delimiters.clone()).parse_line(input, record)
}
