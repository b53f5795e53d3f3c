use thiserror::Error;

/// Errors that can occur during table store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Row already exists in {table}: ({partition_key}, {row_key})")]
    AlreadyExists {
        table: String,
        partition_key: String,
        row_key: String,
    },
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Operation cancelled")]
    Cancelled,
}

/// Errors that can occur when parsing a storage connection string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionStringError {
    #[error("Connection string is empty")]
    Empty,
    #[error("Malformed connection string segment: {0}")]
    MalformedSegment(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Result type for table store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_display() {
        let error = StoreError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
    }

    #[test]
    fn test_already_exists_display() {
        let error = StoreError::AlreadyExists {
            table: "customer".to_string(),
            partition_key: "customer-123".to_string(),
            row_key: "ada@x.com".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Row already exists in customer: (customer-123, ada@x.com)"
        );
    }

    #[test]
    fn test_unknown_column_display() {
        let error = StoreError::UnknownColumn("FirstName, Email".to_string());
        assert_eq!(error.to_string(), "Unknown column: FirstName, Email");
    }

    #[test]
    fn test_cancelled_display() {
        assert_eq!(StoreError::Cancelled.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_connection_string_error_display() {
        let error = ConnectionStringError::InvalidValue {
            key: "UseDevelopmentStorage".to_string(),
            value: "maybe".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value for UseDevelopmentStorage: maybe"
        );
    }
}
