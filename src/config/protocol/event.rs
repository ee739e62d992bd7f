use std::{collections::HashSet, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::{
    config::{Error, Verify},
    core::{protocol::LEVEL_KEY, types::DelimiterSet},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventConfig {
    #[serde(default)]
    pub delimiters: DelimiterSet,
    /// Names given to the leading keyless tokens, in order.
    #[serde(default)]
    pub positional: Vec<String>,
    #[serde(default)]
    pub level_prefix: bool,
}

impl Display for EventConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EventConfig {{ delimiters: {}, positional: [{}], level_prefix: {} }}",
            self.delimiters,
            self.positional.join(", "),
            self.level_prefix
        )
    }
}

impl Verify for EventConfig {
    fn verify(&mut self) -> crate::config::Result<()> {
        super::verify_delimiters("event", &self.delimiters)?;

        if self.positional.iter().any(|name| name.is_empty()) {
            return Err(Error::InvalidConfig(
                "event.positional names cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &self.positional {
            if !seen.insert(name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "event.positional name {} is duplicated",
                    name
                )));
            }
        }

        if self.level_prefix && seen.contains(LEVEL_KEY) {
            return Err(Error::InvalidConfig(format!(
                "event.positional name {} is reserved for the level prefix",
                LEVEL_KEY
            )));
        }

        Ok(())
    }
}
