use thiserror::Error;

use crate::storage::StoreError;

/// Errors that can occur when validating a customer record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustomerError {
    #[error("Partition key cannot be empty")]
    EmptyPartitionKey,
    #[error("Row key cannot be empty")]
    EmptyRowKey,
    #[error("{field} contains a disallowed character: {character:?}")]
    DisallowedCharacter {
        field: &'static str,
        character: char,
    },
}

impl From<CustomerError> for StoreError {
    fn from(err: CustomerError) -> Self {
        StoreError::InvalidRecord(err.to_string())
    }
}
