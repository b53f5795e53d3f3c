use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Result, StoreError};

/// Maximum number of rows a store returns in a single segment.
pub const MAX_PAGE_SIZE: usize = 1000;

/// System column holding the partition key.
pub const PARTITION_KEY_COLUMN: &str = "PartitionKey";
/// System column holding the row key.
pub const ROW_KEY_COLUMN: &str = "RowKey";
/// System column holding the last-modified time assigned by the store.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// A single typed property value stored in a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int64(i64),
    Double(f64),
    Boolean(bool),
}

impl PropertyValue {
    /// Returns the string value, or `None` for non-string properties.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "string",
            PropertyValue::Int64(_) => "int64",
            PropertyValue::Double(_) => "double",
            PropertyValue::Boolean(_) => "boolean",
        }
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

/// The property bag of a row, keyed by column name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A raw row as stored in a table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub partition_key: String,
    pub row_key: String,
    /// Assigned by the store on write.
    pub timestamp: Option<DateTime<Utc>>,
    /// Concurrency token assigned by the store on write.
    pub etag: Option<String>,
    pub properties: Properties,
}

impl TableRow {
    /// Creates a row with the given keys and no properties.
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            ..Default::default()
        }
    }

    /// Adds a property to the row.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Returns the `(partition_key, row_key)` pair identifying this row.
    pub fn key(&self) -> (&str, &str) {
        (&self.partition_key, &self.row_key)
    }
}

/// Opaque cursor returned by a store after a bounded page of results.
///
/// Only the backend that produced a token knows how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of results plus the cursor for the next page, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub continuation: Option<ContinuationToken>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, continuation: Option<ContinuationToken>) -> Self {
        Self {
            items,
            continuation,
        }
    }

    /// Creates the final page of a sequence.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Returns true if no further pages follow this one.
    pub fn is_last(&self) -> bool {
        self.continuation.is_none()
    }
}

/// A validated, de-duplicated, non-empty set of column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection(Vec<String>);

impl ColumnSelection {
    /// Validates `columns` against the columns a table is known to carry.
    ///
    /// Each entry must be exactly one known column name: a comma-joined list
    /// such as `"FirstName, Email"` is rejected as an unknown column.
    pub fn new<I, S>(columns: I, known: &[&str]) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected: Vec<String> = Vec::new();
        for column in columns {
            let column = column.as_ref();
            if !known.contains(&column) {
                return Err(StoreError::UnknownColumn(column.to_string()));
            }
            if !selected.iter().any(|c| c == column) {
                selected.push(column.to_string());
            }
        }

        if selected.is_empty() {
            return Err(StoreError::InvalidQuery(
                "column selection is empty".to_string(),
            ));
        }

        Ok(Self(selected))
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.iter().any(|c| c == column)
    }
}

/// Query over a whole table, optionally projected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    columns: Option<ColumnSelection>,
}

impl TableQuery {
    /// An unfiltered query returning full rows.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the query to the selected columns.
    pub fn select(mut self, columns: ColumnSelection) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn columns(&self) -> Option<&ColumnSelection> {
        self.columns.as_ref()
    }

    /// Returns the segment size to use, given the store's own default.
    pub fn page_size(&self, store_default: usize) -> usize {
        store_default.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Validates a table name: 3-63 ASCII alphanumeric characters, starting with a letter.
pub fn validate_table_name(name: &str) -> Result<()> {
    let valid_length = (3..=63).contains(&name.len());
    let starts_with_letter = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    let alphanumeric = name.chars().all(|c| c.is_ascii_alphanumeric());

    if valid_length && starts_with_letter && alphanumeric {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(name.to_string()))
    }
}
