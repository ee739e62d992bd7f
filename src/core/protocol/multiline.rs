use std::io::Read;

use log::{debug, trace};

use crate::{
    config::protocol::{MultilineConfig, TokenizerConfig},
    core::{
        protocol,
        types::{DelimiterSet, Record, RecordSeq},
    },
};

use super::tokenizer::{lines, Field, Tokenizer};

/// Decides where one logical block ends and the next begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBoundary {
    pub blank_line: bool,
    pub start_keys: Vec<String>,
}

impl Default for BlockBoundary {
    fn default() -> Self {
        Self {
            blank_line: true,
            start_keys: Vec::new(),
        }
    }
}

impl BlockBoundary {
    fn starts_block(&self, first: &Field<'_>) -> bool {
        first
            .name()
            .is_some_and(|name| self.start_keys.iter().any(|k| k == name))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MultilineParser {
    tokenizer: Tokenizer,
    boundary: BlockBoundary,
}

impl MultilineParser {
    pub fn new(tokenizer: Tokenizer, boundary: BlockBoundary) -> Self {
        Self {
            tokenizer,
            boundary,
        }
    }

    pub fn from_config(tokenizer: &TokenizerConfig, cfg: &MultilineConfig) -> Self {
        Self::new(
            Tokenizer::from_config(tokenizer),
            BlockBoundary {
                blank_line: cfg.blank_line,
                start_keys: cfg.start_keys.clone(),
            },
        )
    }

    /// Splits `input` into one record per block, in input order. Blocks that
    /// produce no field are dropped.
    pub fn parse(&self, input: &str) -> RecordSeq {
        let mut records = RecordSeq::new();
        let mut current = Record::new();

        for (lineno, line) in lines(input).enumerate() {
            if line.trim().is_empty() {
                if self.boundary.blank_line {
                    flush(&mut current, &mut records);
                }
                continue;
            }

            let first = match self.tokenizer.fields(line).next() {
                Some(field) => field,
                None => {
                    trace!("Skipping line {} without fields", lineno + 1);
                    continue;
                }
            };

            if self.boundary.starts_block(&first) {
                flush(&mut current, &mut records);
            }

            self.tokenizer.parse_line(line, &mut current);
        }

        flush(&mut current, &mut records);
        debug!("Parsed {} record(s) from multiline input", records.len());

        records
    }

    /// Reads everything from `reader` and parses it. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> protocol::Result<RecordSeq> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let text = String::from_utf8_lossy(&buf);

        Ok(self.parse(&text))
    }
}

fn flush(current: &mut Record, records: &mut RecordSeq) {
    if !current.is_empty() {
        records.push(std::mem::take(current));
    }
}

/// Blank-line separated blocks with the default tokenizer policies.
pub fn parse_multiline(input: &str, delimiters: &DelimiterSet) -> RecordSeq {
    MultilineParser::new(Tokenizer::new(delimiters.clone()), BlockBoundary::default()).parse(input)
}
