use std::{collections::HashSet, fmt::Display};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::{Error, Verify};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MultilineConfig {
    #[serde(default = "default_blank_line")]
    pub blank_line: bool,
    #[serde(default)]
    pub start_keys: Vec<String>,
}

fn default_blank_line() -> bool {
    true
}

impl Default for MultilineConfig {
    fn default() -> Self {
        Self {
            blank_line: default_blank_line(),
            start_keys: Vec::new(),
        }
    }
}

impl Display for MultilineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MultilineConfig {{ blank_line: {}, start_keys: [{}] }}",
            self.blank_line,
            self.start_keys.join(", ")
        )
    }
}

impl Verify for MultilineConfig {
    fn verify(&mut self) -> crate::config::Result<()> {
        if self.start_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "multiline.start_keys cannot contain an empty key".to_string(),
            ));
        }

        let unique = self.start_keys.iter().collect::<HashSet<_>>();
        if unique.len() != self.start_keys.len() {
            warn!("multiline.start_keys contains duplicates");
        }

        if !self.blank_line && self.start_keys.is_empty() {
            warn!("multiline has no block boundary, input is parsed as a single block");
        }

        Ok(())
    }
}
