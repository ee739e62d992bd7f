mod event;
mod multiline;
mod tokenizer;

pub use event::EventConfig;
pub use multiline::MultilineConfig;
pub use tokenizer::TokenizerConfig;

use crate::core::types::{DelimiterSet, PAIR_SEPARATOR};

use super::Error;

fn verify_delimiters(section: &'static str, delimiters: &DelimiterSet) -> super::Result<()> {
    if delimiters.contains(PAIR_SEPARATOR) {
        return Err(Error::InvalidConfig(format!(
            "{}.delimiters must not contain the pair separator '{}'",
            section, PAIR_SEPARATOR
        )));
    }

    Ok(())
}
