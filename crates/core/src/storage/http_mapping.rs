//! Pure functions for mapping store errors to HTTP status codes.
//!
//! This module provides HTTP status code mappings for [`StoreError`] variants,
//! following the Functional Core pattern - pure functions with no side effects.

use super::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `UnknownColumn`, `InvalidQuery`, `InvalidTableName`, `InvalidRecord` -> 400 (Bad Request)
/// - `TableNotFound` -> 404 (Not Found)
/// - `QueryFailed`, `Serialization` -> 500 (Internal Server Error)
/// - `Cancelled` -> 503 (Service Unavailable)
///
/// # Examples
///
/// ```
/// use tablecrud_core::storage::{store_error_to_status_code, StoreError};
///
/// let error = StoreError::UnknownColumn("FirstName, Email".to_string());
/// assert_eq!(store_error_to_status_code(&error), 400);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::ConnectionFailed(_) => 503,
        StoreError::AlreadyExists { .. } => 409,
        StoreError::UnknownColumn(_) => 400,
        StoreError::InvalidQuery(_) => 400,
        StoreError::InvalidTableName(_) => 400,
        StoreError::InvalidRecord(_) => 400,
        StoreError::TableNotFound(_) => 404,
        StoreError::QueryFailed(_) => 500,
        StoreError::Serialization(_) => 500,
        StoreError::Cancelled => 503,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = StoreError::ConnectionFailed("refused".to_string());
        assert_eq!(store_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_already_exists_maps_to_409() {
        let error = StoreError::AlreadyExists {
            table: "customer".to_string(),
            partition_key: "pk".to_string(),
            row_key: "rk".to_string(),
        };
        assert_eq!(store_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        let errors = [
            StoreError::UnknownColumn("Phone".to_string()),
            StoreError::InvalidQuery("empty selection".to_string()),
            StoreError::InvalidTableName("x".to_string()),
            StoreError::InvalidRecord("empty row key".to_string()),
        ];
        for error in &errors {
            assert_eq!(store_error_to_status_code(error), 400, "{error}");
        }
    }

    #[test]
    fn test_table_not_found_maps_to_404() {
        let error = StoreError::TableNotFound("customer".to_string());
        assert_eq!(store_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        assert_eq!(
            store_error_to_status_code(&StoreError::QueryFailed("boom".to_string())),
            500
        );
        assert_eq!(
            store_error_to_status_code(&StoreError::Serialization("bad token".to_string())),
            500
        );
    }

    #[test]
    fn test_cancelled_maps_to_503() {
        assert_eq!(store_error_to_status_code(&StoreError::Cancelled), 503);
    }
}
