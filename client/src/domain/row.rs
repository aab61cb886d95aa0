//! Dynamic row values decoded from ad-hoc queries.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Single column value in a decoded row.
///
/// Column sets vary by query (`SELECT *`, routine result sets), so values
/// are carried as a small tagged union rather than a static struct. Only
/// the integer and text families appear on the upsert surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// Integer-family column (`smallint`, `integer`, `bigint`), widened.
    Integer(i64),
    /// Text-family column (`text`, `varchar`, `char`, `name`).
    Text(String),
    /// SQL NULL of either family.
    Null,
}

impl SqlValue {
    /// Return the integer payload, if this value carries one.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(_) | Self::Null => None,
        }
    }

    /// Return the text payload, if this value carries one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            Self::Integer(_) | Self::Null => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Null => f.write_str("NULL"),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Text(value) => serializer.serialize_str(value),
            Self::Null => serializer.serialize_none(),
        }
    }
}

/// Ordered column-name-to-value mapping for one decoded row.
///
/// Preserves the column order of the originating query, which a hash map
/// would lose. Lookup is linear; rows here carry a handful of columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSnapshot {
    columns: Vec<(String, SqlValue)>,
}

impl RowSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Set a column value, replacing an existing entry of the same name or
    /// appending a new one. Replacement keeps the original column position
    /// so merging the final identifier does not reorder the row.
    pub fn set(&mut self, name: impl Into<String>, value: SqlValue) {
        let name = name.into();
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((name, value)),
        }
    }

    /// Look up a column value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Number of columns in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the snapshot holds no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over columns in their original order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, SqlValue)> for RowSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, SqlValue)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in iter {
            snapshot.set(name, value);
        }
        snapshot
    }
}

impl Serialize for RowSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
