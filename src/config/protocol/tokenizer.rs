use std::fmt::Display;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    config::Verify,
    core::{
        protocol::KeylessPolicy,
        types::{DelimiterSet, DuplicatePolicy},
    },
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TokenizerConfig {
    #[serde(default)]
    pub delimiters: DelimiterSet,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    #[serde(default)]
    pub keyless: KeylessPolicy,
}

impl Display for TokenizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TokenizerConfig {{ delimiters: {}, duplicates: {}, keyless: {} }}",
            self.delimiters, self.duplicates, self.keyless
        )
    }
}

impl Verify for TokenizerConfig {
    fn verify(&mut self) -> crate::config::Result<()> {
        super::verify_delimiters("tokenizer", &self.delimiters)?;

        if self.delimiters.is_empty() {
            warn!("tokenizer.delimiters is empty, every line is a single field");
        }

        Ok(())
    }
}
