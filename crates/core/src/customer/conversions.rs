//! Conversions between customer records and raw table rows.

use crate::storage::{PropertyValue, StoreError, TableRow};

use super::types::{CustomerRecord, EMAIL_COLUMN, FIRST_NAME_COLUMN};

/// Convert a customer record into a row for insertion.
///
/// Store-assigned metadata is carried over unchanged.
pub fn customer_to_row(record: &CustomerRecord) -> TableRow {
    TableRow {
        partition_key: record.partition_key.clone(),
        row_key: record.row_key.clone(),
        timestamp: record.timestamp,
        etag: record.version_tag.clone(),
        properties: Default::default(),
    }
    .with_property(FIRST_NAME_COLUMN, record.first_name.as_str())
    .with_property(EMAIL_COLUMN, record.email.as_str())
}

/// Convert a stored row into a customer record.
///
/// Absent customer columns map to empty strings; columns holding a
/// non-string value are rejected.
pub fn row_to_customer(row: TableRow) -> Result<CustomerRecord, StoreError> {
    let first_name = get_string(&row, FIRST_NAME_COLUMN)?;
    let email = get_string(&row, EMAIL_COLUMN)?;

    Ok(CustomerRecord {
        partition_key: row.partition_key,
        row_key: row.row_key,
        first_name,
        email,
        version_tag: row.etag,
        timestamp: row.timestamp,
    })
}

/// Convert a batch of rows, failing on the first malformed one.
pub fn rows_to_customers(rows: Vec<TableRow>) -> Result<Vec<CustomerRecord>, StoreError> {
    rows.into_iter().map(row_to_customer).collect()
}

fn get_string(row: &TableRow, column: &str) -> Result<String, StoreError> {
    match row.properties.get(column) {
        None => Ok(String::new()),
        Some(PropertyValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(StoreError::Serialization(format!(
            "Column {} of ({}, {}) holds {}, expected string",
            column,
            row.partition_key,
            row.row_key,
            other.type_name()
        ))),
    }
}
