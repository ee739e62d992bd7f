use log::{debug, log_enabled, Level};

use crate::core::types::Record;

/// Writes parsed records to the log at debug level, keys sorted.
pub trait DebugDump {
    fn debug_dump(&self);
}

impl DebugDump for Record {
    fn debug_dump(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }

        debug!("record ({} fields):", self.len());
        for (key, value) in self.sorted() {
            debug!("  {} = {}", key, value);
        }
    }
}

impl DebugDump for [Record] {
    fn debug_dump(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }

        debug!("{} record(s):", self.len());
        for (i, record) in self.iter().enumerate() {
            debug!("[{}] {}", i, record);
        }
    }
}

impl DebugDump for Vec<Record> {
    fn debug_dump(&self) {
        self.as_slice().debug_dump()
    }
}
