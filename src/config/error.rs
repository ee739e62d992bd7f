use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid config file format: {0}")]
    InvalidConfigFileFormat(String),
    #[error(transparent)]
    InvalidJsonConfig(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidTomlConfig(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
