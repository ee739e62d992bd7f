use log::warn;
use nom::{
    character::complete::{char, digit1},
    sequence::delimited,
    IResult, Parser,
};

use crate::{
    config::protocol::EventConfig,
    core::types::{DelimiterSet, Record, PAIR_SEPARATOR},
};

use super::tokenizer::{next_field, Tokenizer};

/// Key under which [`PositionalShape`] stores a `<N>` level prefix.
pub const LEVEL_KEY: &str = "_level";

/// Describes the positional prefix of an event string.
///
/// Both hooks have defaults that make an event parse as plain `key=value`
/// text; a shape overrides one or both to consume leading tokens that are
/// identified by position.
pub trait EventShape {
    /// Byte offset where generic `key=value` scanning starts.
    fn start_process_idx(&self, _event: &str) -> usize {
        0
    }

    /// Interprets `event[..idx_start]` into named fields.
    fn parse_keyless_params(&self, _event: &str, _idx_start: usize, _record: &mut Record) {}
}

/// No positional prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericShape;

impl EventShape for GenericShape {}

impl<S: EventShape + ?Sized> EventShape for &S {
    fn start_process_idx(&self, event: &str) -> usize {
        (**self).start_process_idx(event)
    }

    fn parse_keyless_params(&self, event: &str, idx_start: usize, record: &mut Record) {
        (**self).parse_keyless_params(event, idx_start, record)
    }
}

impl<S: EventShape + ?Sized> EventShape for Box<S> {
    fn start_process_idx(&self, event: &str) -> usize {
        (**self).start_process_idx(event)
    }

    fn parse_keyless_params(&self, event: &str, idx_start: usize, record: &mut Record) {
        (**self).parse_keyless_params(event, idx_start, record)
    }
}

fn level_prefix(input: &str) -> IResult<&str, &str> {
    delimited(char('<'), digit1, char('>')).parse(input)
}

#[derive(Debug, Default)]
struct Prefix<'a> {
    level: Option<&'a str>,
    tokens: Vec<&'a str>,
    end: usize,
}

/// Names a fixed number of leading tokens, e.g. `["_opcode", "_mac"]` for
/// `AP-STA-CONNECTED 11:22:33:44:55:66 keyid=1`. Scanning stops early at the
/// first token that looks like `key=value`, so short events still parse.
#[derive(Debug, Clone, Default)]
pub struct PositionalShape {
    names: Vec<String>,
    delimiters: DelimiterSet,
    level_prefix: bool,
}

impl PositionalShape {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            delimiters: DelimiterSet::default(),
            level_prefix: false,
        }
    }

    /// Token separators; should match the delimiters of the event tokenizer.
    pub fn with_delimiters(mut self, delimiters: DelimiterSet) -> Self {
        self.delimiters = delimiters;
        self
    }

    /// Accept a `<N>` control-interface level prefix before the first token.
    pub fn with_level_prefix(mut self, enabled: bool) -> Self {
        self.level_prefix = enabled;
        self
    }

    fn scan<'a>(&self, event: &'a str) -> Prefix<'a> {
        let mut prefix = Prefix::default();
        let mut input = event;

        if self.level_prefix {
            if let Ok((remaining, level)) = level_prefix(input) {
                prefix.level = Some(level);
                input = remaining;
            }
        }

        while prefix.tokens.len() < self.names.len() {
            let Ok((remaining, raw)) = next_field(input, &self.delimiters) else {
                break;
            };
            let tok = raw.trim();
            if tok.is_empty() {
                input = remaining;
                continue;
            }
            if tok.contains(PAIR_SEPARATOR) {
                break;
            }
            prefix.tokens.push(tok);
            input = remaining;
        }

        prefix.end = event.len() - input.len();
        prefix
    }
}

impl EventShape for PositionalShape {
    fn start_process_idx(&self, event: &str) -> usize {
        self.scan(event).end
    }

    fn parse_keyless_params(&self, event: &str, idx_start: usize, record: &mut Record) {
        let prefix = self.scan(&event[..idx_start]);

        if let Some(level) = prefix.level {
            record.set(LEVEL_KEY, level);
        }
        for (name, tok) in self.names.iter().zip(prefix.tokens) {
            record.set(name.as_str(), tok);
        }
    }
}

/// Builds the shape described by an `[event]` config section.
pub fn shape_from_config(cfg: &EventConfig) -> Box<dyn EventShape + Send + Sync> {
    if cfg.positional.is_empty() && !cfg.level_prefix {
        Box::new(GenericShape)
    } else {
        Box::new(
            PositionalShape::new(cfg.positional.iter().cloned())
                .with_delimiters(cfg.delimiters.clone())
                .with_level_prefix(cfg.level_prefix),
        )
    }
}

/// Parses single event strings: positional prefix through the shape hooks,
/// the remainder as `key=value` fields.
#[derive(Debug, Clone)]
pub struct EventParser<S = GenericShape> {
    tokenizer: Tokenizer,
    shape: S,
}

impl Default for EventParser<GenericShape> {
    fn default() -> Self {
        Self::new()
    }
}

impl EventParser<GenericShape> {
    pub fn new() -> Self {
        Self::with_shape(GenericShape)
    }
}

impl EventParser<Box<dyn EventShape + Send + Sync>> {
    pub fn from_config(cfg: &EventConfig) -> Self {
        Self::with_shape(shape_from_config(cfg))
            .with_tokenizer(Tokenizer::new(cfg.delimiters.clone()))
    }
}

impl<S: EventShape> EventParser<S> {
    /// Whitespace-delimited events with `shape` deciding the prefix.
    pub fn with_shape(shape: S) -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            shape,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn parse_event(&self, event: &str) -> Record {
        let mut record = Record::new();
        self.parse_event_into(event, &mut record);
        record
    }

    /// Adds the fields of `event` to `record`. An offset the shape reports
    /// outside the string, or inside a character, makes the whole event parse
    /// generically.
    pub fn parse_event_into(&self, event: &str, record: &mut Record) {
        let idx = self.shape.start_process_idx(event);

        let idx = if event.is_char_boundary(idx) {
            self.shape.parse_keyless_params(event, idx, record);
            idx
        } else {
            warn!(
                "Unrecognized event shape (offset {} of {}), parsing generically: {:?}",
                idx,
                event.len(),
                event
            );
            0
        };

        self.tokenizer.parse_line(&event[idx..], record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Everything up to and including the hardware address goes into `tag`.
    struct TagMacShape;

    impl EventShape for TagMacShape {
        fn start_process_idx(&self, event: &str) -> usize {
            let mut spaces = event.match_indices(' ');
            match spaces.nth(1) {
                Some((idx, _)) => idx,
                None => event.len(),
            }
        }

        fn parse_keyless_params(&self, event: &str, idx_start: usize, record: &mut Record) {
            record.set("tag", event[..idx_start].trim());
        }
    }

    #[test]
    fn test_generic_event() {
        let record = EventParser::new().parse_event("freq=2412 snr=40");
        assert_eq!(record, Record::from_iter([("freq", "2412"), ("snr", "40")]));
    }

    #[test]
    fn test_generic_event_skips_leading_tokens() {
        let record = EventParser::new().parse_event("CONNECTED aa:bb:cc:dd:ee:ff freq=2412");
        assert_eq!(record, Record::from_iter([("freq", "2412")]));
    }

    #[test]
    fn test_custom_shape() {
        let parser = EventParser::with_shape(TagMacShape);
        let record = parser.parse_event("CONNECTED aa:bb:cc:dd:ee:ff freq=2412 snr=40");

        assert_eq!(record.len(), 3);
        assert_eq!(record.get("tag"), Some("CONNECTED aa:bb:cc:dd:ee:ff"));
        assert_eq!(record.get("freq"), Some("2412"));
        assert_eq!(record.get("snr"), Some("40"));
    }

    #[test]
    fn test_borrowed_shape() {
        let shape = TagMacShape;
        let parser = EventParser::with_shape(&shape);
        let record = parser.parse_event("DISCONNECTED aa:bb:cc:dd:ee:ff reason=3");
        assert_eq!(record.get("tag"), Some("DISCONNECTED aa:bb:cc:dd:ee:ff"));
        assert_eq!(record.get("reason"), Some("3"));
    }

    struct BrokenShape(usize);

    impl EventShape for BrokenShape {
        fn start_process_idx(&self, _event: &str) -> usize {
            self.0
        }

        fn parse_keyless_params(&self, _event: &str, _idx_start: usize, record: &mut Record) {
            record.set("hook", "called");
        }
    }

    #[test]
    fn test_out_of_range_offset_falls_back() {
        let record = EventParser::with_shape(BrokenShape(1000)).parse_event("a=1 b=2");
        assert_eq!(record, Record::from_iter([("a", "1"), ("b", "2")]));
    }

    #[test]
    fn test_offset_inside_char_falls_back() {
        let record = EventParser::with_shape(BrokenShape(1)).parse_event("é=1 b=2");
        assert_eq!(record, Record::from_iter([("é", "1"), ("b", "2")]));
    }

    #[test]
    fn test_positional_shape() {
        let parser = EventParser::with_shape(
            PositionalShape::new(["_opcode", "_mac"]).with_level_prefix(true),
        );
        let record = parser.parse_event("<3>AP-STA-CONNECTED 11:22:33:44:55:66 keyid=2 vlan=0");

        assert_eq!(record.get(LEVEL_KEY), Some("3"));
        assert_eq!(record.get("_opcode"), Some("AP-STA-CONNECTED"));
        assert_eq!(record.get("_mac"), Some("11:22:33:44:55:66"));
        assert_eq!(record.get("keyid"), Some("2"));
        assert_eq!(record.get("vlan"), Some("0"));
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_positional_shape_short_event() {
        let parser = EventParser::with_shape(PositionalShape::new(["_opcode", "_mac", "_iface"]));

        let record = parser.parse_event("CTRL-EVENT-TERMINATING reason=1");
        assert_eq!(record.get("_opcode"), Some("CTRL-EVENT-TERMINATING"));
        assert_eq!(record.get("reason"), Some("1"));
        assert!(!record.contains_key("_mac"));

        let record = parser.parse_event("");
        assert!(record.is_empty());
    }

    #[test]
    fn test_positional_shape_without_level_keeps_it_as_token() {
        let parser = EventParser::with_shape(PositionalShape::new(["_opcode"]));
        let record = parser.parse_event("<3>AP-ENABLED");
        assert_eq!(record.get("_opcode"), Some("<3>AP-ENABLED"));
        assert!(!record.contains_key(LEVEL_KEY));
    }

    #[test]
    fn test_shape_from_config() {
        let cfg = EventConfig {
            positional: vec!["_opcode".to_string()],
            level_prefix: true,
            ..Default::default()
        };
        let parser = EventParser::from_config(&cfg);
        let record = parser.parse_event("<2>CTRL-EVENT-SCAN-RESULTS\tfreq=5180");
        assert_eq!(record.get(LEVEL_KEY), Some("2"));
        assert_eq!(record.get("_opcode"), Some("CTRL-EVENT-SCAN-RESULTS"));
        assert_eq!(record.get("freq"), Some("5180"));

        let parser = EventParser::from_config(&EventConfig::default());
        let record = parser.parse_event("<2>X a=1");
        assert_eq!(record, Record::from_iter([("a", "1")]));
    }

    #[test]
    fn test_shape_from_config_uses_event_delimiters() {
        let cfg = EventConfig {
            delimiters: DelimiterSet::from(","),
            positional: vec!["_opcode".to_string(), "_mac".to_string()],
            ..Default::default()
        };
        let parser = EventParser::from_config(&cfg);

        let record = parser.parse_event("CONNECTED,aa:bb, freq=1");
        assert_eq!(record.get("_opcode"), Some("CONNECTED"));
        assert_eq!(record.get("_mac"), Some("aa:bb"));
        assert_eq!(record.get("freq"), Some("1"));
        assert_eq!(record.len(), 3);

        let record = parser.parse_event("CONNECTED,,freq=1");
        assert_eq!(record.get("_opcode"), Some("CONNECTED"));
        assert!(!record.contains_key("_mac"));
        assert_eq!(record.get("freq"), Some("1"));
    }

    #[test]
    fn test_idempotent_into_independent_records() {
        let parser = EventParser::with_shape(PositionalShape::new(["_opcode", "_mac"]));
        let event = "AP-STA-DISCONNECTED 11:22:33:44:55:66 reason=8";
        assert_eq!(parser.parse_event(event), parser.parse_event(event));
    }
}
