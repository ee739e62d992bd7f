use std::fmt::Display;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Separates a key from its value inside a field.
pub const PAIR_SEPARATOR: char = '=';

/// Space and tab, the separators used by control-interface event text.
pub static WHITESPACE: Lazy<DelimiterSet> = Lazy::new(|| DelimiterSet::new([' ', '\t']));

/// Ordered set of characters that split a line into fields.
///
/// Serialized as a plain string whose characters are the delimiters, so
/// `" \t,"` in a config file means space, tab and comma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DelimiterSet(Vec<char>);

impl DelimiterSet {
    pub fn new<I>(chars: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let mut set = Vec::new();
        for c in chars {
            if !set.contains(&c) {
                set.push(c);
            }
        }
        Self(set)
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }
}

impl Default for DelimiterSet {
    fn default() -> Self {
        WHITESPACE.clone()
    }
}

impl From<String> for DelimiterSet {
    fn from(s: String) -> Self {
        Self::new(s.chars())
    }
}

impl From<&str> for DelimiterSet {
    fn from(s: &str) -> Self {
        Self::new(s.chars())
    }
}

impl From<DelimiterSet> for String {
    fn from(set: DelimiterSet) -> Self {
        set.0.into_iter().collect()
    }
}

impl Display for DelimiterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0.iter().collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_are_collapsed_in_order() {
        let set = DelimiterSet::from(", ,\t");
        assert_eq!(set.chars(), &[',', ' ', '\t']);
    }

    #[test]
    fn test_default_is_whitespace() {
        let set = DelimiterSet::default();
        assert!(set.contains(' '));
        assert!(set.contains('\t'));
        assert!(!set.contains(','));
    }

    #[test]
    fn test_serde_as_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            delimiters: DelimiterSet,
        }

        let wrapper: Wrapper = toml::from_str("delimiters = \",;\"").unwrap();
        assert_eq!(wrapper.delimiters.chars(), &[',', ';']);

        let json = serde_json::to_string(&DelimiterSet::from("ab")).unwrap();
        assert_eq!(json, "\"ab\"");
    }
}
