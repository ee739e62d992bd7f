mod access;
mod delimiter;
mod error;
mod record;

pub use access::{read_param_int, read_param_str};
pub use delimiter::{DelimiterSet, PAIR_SEPARATOR, WHITESPACE};
pub use error::{Error, Result};
pub use record::{DuplicatePolicy, Record};

/// Records parsed from a multi-block input, in input order.
pub type RecordSeq = Vec<Record>;
