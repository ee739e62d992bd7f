pub mod error;
pub mod logging;
pub mod protocol;

use std::{fs::File, io::BufReader, path::Path};

pub use error::{Error, Result};
pub use logging::LogConfig;
pub use protocol::{EventConfig, MultilineConfig, TokenizerConfig};
use serde::{Deserialize, Serialize};

pub trait Verify {
    fn verify(&mut self) -> error::Result<()>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
    #[serde(default)]
    pub multiline: MultilineConfig,
    #[serde(default)]
    pub event: EventConfig,
}

impl Config {
    pub fn load_from_file(path: &Path) -> error::Result<Self> {
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Config file not found: {}", path.display()),
            )));
        }

        if !path.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Given config file path is not a file: {}", path.display()),
            )));
        }

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        let mut config: Config = match ext {
            "json" => serde_json::from_reader(BufReader::new(File::open(path)?))?,
            "toml" => {
                let text = std::fs::read_to_string(path)?;
                toml::de::from_str(&text)?
            }
            _ => return Err(Error::InvalidConfigFileFormat(ext.to_string())),
        };

        config.verify()?;

        Ok(config)
    }
}

impl Verify for Config {
    fn verify(&mut self) -> error::Result<()> {
        self.log.verify()?;
        self.tokenizer.verify()?;
        self.multiline.verify()?;
        self.event.verify()?;

        log::debug!("Using {}", self.tokenizer);
        log::debug!("Using {}", self.multiline);
        log::debug!("Using {}", self.event);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::core::{protocol::KeylessPolicy, types::DuplicatePolicy};

    fn write_config(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write config");
        file
    }

    #[test]
    fn test_load_toml() {
        let file = write_config(
            ".toml",
            r#"
[log]
level = "debug"
console = false
file = "wlkv.log"

[tokenizer]
delimiters = " ,"
duplicates = "first_wins"
keyless = "capture"

[multiline]
blank_line = false
start_keys = ["bss"]

[event]
positional = ["_opcode", "_mac"]
level_prefix = true
"#,
        );

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.log.level, "debug");
        assert!(!config.log.console);
        assert_eq!(config.tokenizer.delimiters.chars(), &[' ', ',']);
        assert_eq!(config.tokenizer.duplicates, DuplicatePolicy::FirstWins);
        assert_eq!(config.tokenizer.keyless, KeylessPolicy::Capture);
        assert!(!config.multiline.blank_line);
        assert_eq!(config.multiline.start_keys, vec!["bss".to_string()]);
        assert_eq!(config.event.positional.len(), 2);
        assert!(config.event.level_prefix);
        assert_eq!(config.event.delimiters.chars(), &[' ', '\t']);
    }

    #[test]
    fn test_load_json_with_defaults() {
        let file = write_config(".json", r#"{ "tokenizer": { "delimiters": "\t" } }"#);

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.tokenizer.delimiters.chars(), &['\t']);
        assert_eq!(config.tokenizer.duplicates, DuplicatePolicy::LastWins);
        assert!(config.multiline.blank_line);
        assert_eq!(config.log.module, "wlkv");
    }

    #[test]
    fn test_separator_as_delimiter_is_rejected() {
        let file = write_config(".toml", "[tokenizer]\ndelimiters = \" =\"\n");
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let file = write_config(".toml", "[log]\nlevel = \"loud\"\n");
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(Error::InvalidConfig(_))
        ));

        let file = write_config(".toml", "[event]\npositional = [\"_mac\", \"_mac\"]\n");
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(Error::InvalidConfig(_))
        ));

        let file = write_config(
            ".toml",
            "[event]\npositional = [\"_level\"]\nlevel_prefix = true\n",
        );
        assert!(Config::load_from_file(file.path()).is_err());

        let file = write_config(".toml", "[multiline]\nstart_keys = [\" \"]\n");
        assert!(Config::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_unknown_format_and_missing_file() {
        let file = write_config(".yaml", "log: {}");
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(Error::InvalidConfigFileFormat(_))
        ));

        assert!(matches!(
            Config::load_from_file(Path::new("/nonexistent/wlkv.toml")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let file = write_config(".toml", "[tokenizer\n");
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(Error::InvalidTomlConfig(_))
        ));
    }
}
