use std::num::ParseIntError;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum Error {
    #[error("Can not find key in record: {0}")]
    MissingKey(String),
    #[error("Invalid integer for key {key}: {value:?}")]
    InvalidInt {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
