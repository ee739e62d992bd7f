use std::{collections::HashMap, fmt::Display};

use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// What happens when a key that is already present is inserted again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    LastWins,
    FirstWins,
}

impl Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::LastWins => write!(f, "last_wins"),
            DuplicatePolicy::FirstWins => write!(f, "first_wins"),
        }
    }
}

/// One parsed key/value block. Values are always kept as the raw strings
/// found in the input; typed interpretation happens on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts with last-write-wins semantics. Empty keys are refused.
    pub fn set<K, V>(&mut self, key: K, value: V) -> bool
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(key, value, DuplicatePolicy::LastWins)
    }

    /// Returns `true` when the value was stored.
    pub fn insert<K, V>(&mut self, key: K, value: V, policy: DuplicatePolicy) -> bool
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        if key.is_empty() {
            return false;
        }

        match policy {
            DuplicatePolicy::LastWins => {
                self.fields.insert(key, value.into());
                true
            }
            DuplicatePolicy::FirstWins => {
                if self.fields.contains_key(&key) {
                    return false;
                }
                self.fields.insert(key, value.into());
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fields ordered by key, for stable output.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut fields = self.iter().collect::<Vec<_>>();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        fields
    }

    pub fn read_str(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::MissingKey(key.to_string()))
    }

    /// Base-10 with an optional leading sign. Values outside the `i64` range fail.
    pub fn read_int(&self, key: &str) -> Result<i64> {
        let value = self.read_str(key)?;
        value.parse::<i64>().map_err(|source| Error::InvalidInt {
            key: key.to_string(),
            value: value.to_string(),
            source,
        })
    }

    /// Writes `out` only on success. With `ignore_unknown` a missing key is
    /// reported as success and `out` keeps whatever the caller seeded it with.
    pub fn read_int_into(&self, key: &str, out: &mut i64, ignore_unknown: bool) -> Result<()> {
        match self.read_int(key) {
            Ok(value) => {
                *out = value;
                Ok(())
            }
            Err(Error::MissingKey(_)) if ignore_unknown => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self
            .sorted()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        write!(f, "{{ {} }}", fields)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

/// Goes through [`Record::set`], so empty keys are dropped.
impl From<HashMap<String, String>> for Record {
    fn from(fields: HashMap<String, String>) -> Self {
        fields.into_iter().collect()
    }
}

impl From<Record> for HashMap<String, String> {
    fn from(record: Record) -> Self {
        record.fields
    }
}
