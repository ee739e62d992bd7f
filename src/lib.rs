//! Key/value record parsing for the text output of wireless drivers and
//! control interfaces.
//!
//! ```
//! use wlkv::core::protocol::{EventParser, PositionalShape};
//!
//! let parser = EventParser::with_shape(PositionalShape::new(["_opcode", "_mac"]));
//! let record = parser.parse_event("AP-STA-CONNECTED 11:22:33:44:55:66 keyid=1");
//!
//! assert_eq!(record.read_str("_mac").unwrap(), "11:22:33:44:55:66");
//! assert_eq!(record.read_int("keyid").unwrap(), 1);
//! ```

pub mod config;
pub mod core;
pub mod utils;
