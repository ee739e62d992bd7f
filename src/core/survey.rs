use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::types::{self, Record};

/// One channel of a survey dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyEntry {
    pub frequency_mhz: u32,
    pub in_use: bool,
    pub noise_dbm: i8,
    pub time_on_ms: u64,
    pub time_busy_ms: u64,
}

impl SurveyEntry {
    /// Builds an entry from a parsed survey block. `frequency` is required;
    /// `in_use`, `noise`, `time_on` and `time_busy` default to zero. Negative
    /// or out-of-range numbers are clamped into the field's range.
    pub fn from_record(record: &Record) -> types::Result<Self> {
        let frequency = record.read_int("frequency")?;

        let mut in_use = 0;
        let mut noise = 0;
        let mut time_on = 0;
        let mut time_busy = 0;
        types::read_param_int("in_use", record, &mut in_use, true)?;
        types::read_param_int("noise", record, &mut noise, true)?;
        types::read_param_int("time_on", record, &mut time_on, true)?;
        types::read_param_int("time_busy", record, &mut time_busy, true)?;

        Ok(Self {
            frequency_mhz: frequency.clamp(0, u32::MAX as i64) as u32,
            in_use: in_use != 0,
            noise_dbm: noise.clamp(i8::MIN as i64, i8::MAX as i64) as i8,
            time_on_ms: time_on.max(0) as u64,
            time_busy_ms: time_busy.max(0) as u64,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyInfo {
    pub entries: Vec<SurveyEntry>,
}

impl SurveyInfo {
    /// Records that fail to convert are logged and left out.
    pub fn from_records(records: &[Record]) -> Self {
        let entries = records
            .iter()
            .filter_map(|record| match SurveyEntry::from_record(record) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping survey block {}: {}", record, e);
                    None
                }
            })
            .collect();

        Self { entries }
    }

    /// Busy time of the in-use channel as a percentage of its active time.
    /// `None` when no channel is in use or the active time is zero.
    pub fn channel_utilization(&self) -> Option<u8> {
        let entry = self.entries.iter().find(|e| e.in_use)?;
        if entry.time_on_ms == 0 {
            return None;
        }

        let percent = entry.time_busy_ms.saturating_mul(100) / entry.time_on_ms;
        Some(percent.min(100) as u8)
    }
}
