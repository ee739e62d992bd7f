mod error;
mod event;
mod multiline;
mod tokenizer;

pub use error::{Error, Result};
pub use event::{
    shape_from_config, EventParser, EventShape, GenericShape, PositionalShape, LEVEL_KEY,
};
pub use multiline::{parse_multiline, BlockBoundary, MultilineParser};
pub use tokenizer::{lines, parse_line, Field, Fields, KeylessPolicy, Lines, Tokenizer};
