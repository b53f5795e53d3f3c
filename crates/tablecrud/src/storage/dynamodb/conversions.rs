//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and table rows.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};

use tablecrud_core::storage::{
    ColumnSelection, ContinuationToken, PropertyValue, StoreError, TableRow,
    PARTITION_KEY_COLUMN, ROW_KEY_COLUMN, TIMESTAMP_COLUMN,
};

/// Attribute holding the store-assigned version tag.
pub const ETAG_ATTRIBUTE: &str = "ETag";

pub type Item = HashMap<String, AttributeValue>;

// ============================================================================
// Row conversions
// ============================================================================

/// Convert a row to a DynamoDB item.
pub fn row_to_item(row: &TableRow) -> Item {
    let mut item = HashMap::new();

    // Keys
    item.insert(
        PARTITION_KEY_COLUMN.to_string(),
        AttributeValue::S(row.partition_key.clone()),
    );
    item.insert(
        ROW_KEY_COLUMN.to_string(),
        AttributeValue::S(row.row_key.clone()),
    );

    // Store metadata
    if let Some(timestamp) = row.timestamp {
        item.insert(
            TIMESTAMP_COLUMN.to_string(),
            AttributeValue::S(timestamp.to_rfc3339()),
        );
    }
    if let Some(etag) = &row.etag {
        item.insert(ETAG_ATTRIBUTE.to_string(), AttributeValue::S(etag.clone()));
    }

    // Data
    for (name, value) in &row.properties {
        item.insert(name.clone(), property_to_attribute(value));
    }

    item
}

/// Convert a DynamoDB item to a row.
pub fn item_to_row(item: &Item) -> Result<TableRow, StoreError> {
    let mut row = TableRow::new(
        get_string(item, PARTITION_KEY_COLUMN)?,
        get_string(item, ROW_KEY_COLUMN)?,
    );
    row.timestamp = get_optional_datetime(item, TIMESTAMP_COLUMN)?;
    row.etag = get_optional_string(item, ETAG_ATTRIBUTE)?;

    for (name, value) in item {
        if is_reserved(name) {
            continue;
        }
        row.properties
            .insert(name.clone(), attribute_to_property(name, value)?);
    }

    Ok(row)
}

fn is_reserved(name: &str) -> bool {
    [
        PARTITION_KEY_COLUMN,
        ROW_KEY_COLUMN,
        TIMESTAMP_COLUMN,
        ETAG_ATTRIBUTE,
    ]
    .contains(&name)
}

fn property_to_attribute(value: &PropertyValue) -> AttributeValue {
    match value {
        PropertyValue::String(s) => AttributeValue::S(s.clone()),
        PropertyValue::Int64(n) => AttributeValue::N(n.to_string()),
        // Debug output always carries a fraction or exponent (`2.0`, `1e100`).
        PropertyValue::Double(n) => AttributeValue::N(format!("{n:?}")),
        PropertyValue::Boolean(b) => AttributeValue::Bool(*b),
    }
}

fn attribute_to_property(name: &str, value: &AttributeValue) -> Result<PropertyValue, StoreError> {
    match value {
        AttributeValue::S(s) => Ok(PropertyValue::String(s.clone())),
        AttributeValue::Bool(b) => Ok(PropertyValue::Boolean(*b)),
        AttributeValue::N(n) => parse_number(n)
            .ok_or_else(|| StoreError::Serialization(format!("Invalid number for {name}: {n}"))),
        other => Err(StoreError::Serialization(format!(
            "Unsupported attribute type for {name}: {other:?}"
        ))),
    }
}

/// Numbers with a fraction or exponent are doubles, everything else an integer.
fn parse_number(n: &str) -> Option<PropertyValue> {
    if n.contains(['.', 'e', 'E']) {
        return n.parse::<f64>().ok().map(PropertyValue::Double);
    }
    n.parse::<i64>()
        .map(PropertyValue::Int64)
        .or_else(|_| n.parse::<f64>().map(PropertyValue::Double))
        .ok()
}

// ============================================================================
// Continuation tokens
// ============================================================================

/// Encode a scan's `LastEvaluatedKey` as an opaque continuation token.
pub fn key_to_token(key: &Item) -> Result<ContinuationToken, StoreError> {
    let partition_key = get_string(key, PARTITION_KEY_COLUMN)?;
    let row_key = get_string(key, ROW_KEY_COLUMN)?;
    serde_json::to_string(&[partition_key, row_key])
        .map(ContinuationToken::new)
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a continuation token back into an `ExclusiveStartKey`.
pub fn token_to_key(token: &ContinuationToken) -> Result<Item, StoreError> {
    let [partition_key, row_key]: [String; 2] = serde_json::from_str(token.as_str())
        .map_err(|e| StoreError::Serialization(format!("Invalid continuation token: {e}")))?;

    Ok(HashMap::from([
        (
            PARTITION_KEY_COLUMN.to_string(),
            AttributeValue::S(partition_key),
        ),
        (ROW_KEY_COLUMN.to_string(), AttributeValue::S(row_key)),
    ]))
}

// ============================================================================
// Projections
// ============================================================================

/// Build a `ProjectionExpression` and its attribute name placeholders.
///
/// The key columns, timestamp and version tag are always included so that
/// projected rows can still be converted with [`item_to_row`].
pub fn projection_expression(selection: &ColumnSelection) -> (String, HashMap<String, String>) {
    let columns = [
        PARTITION_KEY_COLUMN,
        ROW_KEY_COLUMN,
        TIMESTAMP_COLUMN,
        ETAG_ATTRIBUTE,
    ]
    .into_iter()
    .chain(
        selection
            .columns()
            .iter()
            .map(String::as_str)
            .filter(|c| !is_reserved(c)),
    );

    let mut placeholders = Vec::new();
    let mut names = HashMap::new();
    for (i, column) in columns.enumerate() {
        let placeholder = format!("#c{i}");
        names.insert(placeholder.clone(), column.to_string());
        placeholders.push(placeholder);
    }

    (placeholders.join(", "), names)
}

// ============================================================================
// Helper functions
// ============================================================================

fn get_string(item: &Item, key: &str) -> Result<String, StoreError> {
    get_optional_string(item, key)?
        .ok_or_else(|| StoreError::Serialization(format!("Missing field: {key}")))
}

fn get_optional_string(item: &Item, key: &str) -> Result<Option<String>, StoreError> {
    match item.get(key) {
        Some(AttributeValue::S(s)) => Ok(Some(s.clone())),
        Some(_) => Err(StoreError::Serialization(format!(
            "Invalid type for field: {key}"
        ))),
        None => Ok(None),
    }
}

fn get_optional_datetime(item: &Item, key: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
    get_optional_string(item, key)?
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| StoreError::Serialization(format!("Invalid datetime: {e}")))
        })
        .transpose()
}
