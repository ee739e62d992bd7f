//! Free-standing typed accessors, for callers that keep an output slot per
//! field and seed it with a default before reading.

use super::{Record, Result};

/// Reads `key` as an `i64` into `value`.
///
/// `value` is written only on success. A missing key fails unless
/// `ignore_unknown` is set, in which case `value` is left as it was.
pub fn read_param_int(
    key: &str,
    record: &Record,
    value: &mut i64,
    ignore_unknown: bool,
) -> Result<()> {
    record.read_int_into(key, value, ignore_unknown)
}

/// Borrows the raw string stored under `key`. The returned slice lives as
/// long as the record it came from.
pub fn read_param_str<'a>(key: &str, record: &'a Record) -> Result<&'a str> {
    record.read_str(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Error;

    #[test]
    fn test_read_param_int() {
        let record = Record::from_iter([("n", "42"), ("s", "abc")]);

        let mut out = 0;
        assert!(read_param_int("n", &record, &mut out, false).is_ok());
        assert_eq!(out, 42);

        let mut out = 7;
        assert!(read_param_int("s", &record, &mut out, false).is_err());
        assert_eq!(out, 7);
    }

    #[test]
    fn test_read_param_int_ignore_unknown() {
        let record = Record::new();

        let mut out = 5;
        assert_eq!(
            read_param_int("missing", &record, &mut out, false),
            Err(Error::MissingKey("missing".to_string()))
        );
        assert_eq!(out, 5);

        assert_eq!(read_param_int("missing", &record, &mut out, true), Ok(()));
        assert_eq!(out, 5);
    }

    #[test]
    fn test_read_param_str() {
        let record = Record::from_iter([("iface", "wlan0")]);

        let mut out: Option<&str> = None;
        if let Ok(v) = read_param_str("iface", &record) {
            out = Some(v);
        }
        assert_eq!(out, Some("wlan0"));

        assert!(read_param_str("bssid", &record).is_err());
    }
}
