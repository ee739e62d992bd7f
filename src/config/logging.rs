use std::{fmt::Display, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{Error, Verify};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Colored output on stderr.
    #[serde(default = "default_console")]
    pub console: bool,
    /// Plain-text log file, disabled when unset.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Replaces the crate name in log targets.
    #[serde(default = "default_module")]
    pub module: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_console() -> bool {
    true
}

fn default_module() -> String {
    "wlkv".to_string()
}

impl LogConfig {
    /// `RUST_LOG` wins over the configured level.
    pub fn level_filter(&self) -> log::LevelFilter {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| log::LevelFilter::from_str(&level).ok())
            .or_else(|| log::LevelFilter::from_str(&self.level).ok())
            .unwrap_or(log::LevelFilter::Info)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            console: default_console(),
            file: None,
            module: default_module(),
        }
    }
}

impl Display for LogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = self
            .file
            .as_ref()
            .map_or("none".to_string(), |p| p.display().to_string());

        write!(
            f,
            "LogConfig {{ level: {}, console: {}, file: {}, module: {} }}",
            self.level, self.console, file, self.module
        )
    }
}

impl Verify for LogConfig {
    fn verify(&mut self) -> super::Result<()> {
        if log::LevelFilter::from_str(&self.level).is_err() {
            return Err(Error::InvalidConfig(format!(
                "log.level {} is not one of off, error, warn, info, debug, trace",
                self.level
            )));
        }

        if self.module.is_empty() {
            return Err(Error::InvalidConfig("log.module cannot be empty".to_string()));
        }

        Ok(())
    }
}
