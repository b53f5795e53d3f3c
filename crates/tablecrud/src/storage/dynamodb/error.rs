//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `tablecrud_core::storage`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use tablecrud_core::storage::StoreError;

/// Error codes returned when the credentials are missing or rejected.
const AUTH_ERROR_CODES: &[&str] = &[
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "AccessDeniedException",
    "MissingAuthenticationTokenException",
];

/// Returns the connection failure for errors that never reached the service.
fn transport_failure<E, R>(err: &SdkError<E, R>) -> Option<StoreError> {
    match err {
        SdkError::DispatchFailure(_) => Some(StoreError::ConnectionFailed(
            "Could not reach DynamoDB".to_string(),
        )),
        SdkError::TimeoutError(_) => Some(StoreError::ConnectionFailed(
            "DynamoDB request timed out".to_string(),
        )),
        _ => None,
    }
}

/// Maps an unclassified service error, treating auth failures as connection failures.
fn fallback<E: ProvideErrorMetadata + Debug>(operation: &str, err: E) -> StoreError {
    match err.code() {
        Some(code) if AUTH_ERROR_CODES.contains(&code) => {
            StoreError::ConnectionFailed(format!("DynamoDB rejected the credentials: {code}"))
        }
        _ => StoreError::QueryFailed(format!("{operation} failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table: &str,
) -> StoreError {
    if let Some(failure) = transport_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        ScanError::ProvisionedThroughputExceededException(_) => {
            StoreError::QueryFailed("Throughput exceeded, please retry".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            StoreError::QueryFailed("Request limit exceeded, please retry".to_string())
        }
        ScanError::InternalServerError(_) => {
            StoreError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => fallback("Scan", err),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table: &str,
    partition_key: &str,
    row_key: &str,
) -> StoreError {
    if let Some(failure) = transport_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => StoreError::AlreadyExists {
            table: table.to_string(),
            partition_key: partition_key.to_string(),
            row_key: row_key.to_string(),
        },
        PutItemError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        PutItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::QueryFailed("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            StoreError::QueryFailed("Request limit exceeded, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            StoreError::QueryFailed("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => {
            StoreError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => fallback("PutItem", err),
    }
}

/// Map a DescribeTable SDK error to StoreError.
///
/// A missing table is reported as `TableNotFound`, which callers use to decide
/// whether to create it.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table: &str,
) -> StoreError {
    if let Some(failure) = transport_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => {
            StoreError::TableNotFound(table.to_string())
        }
        DescribeTableError::InternalServerError(_) => {
            StoreError::QueryFailed("DynamoDB internal server error".to_string())
        }
        err => fallback("DescribeTable", err),
    }
}

/// Map a CreateTable SDK error to StoreError.
///
/// Returns `None` when another writer created the table first.
pub fn map_create_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<CreateTableError, R>,
) -> Option<StoreError> {
    if let Some(failure) = transport_failure(&err) {
        return Some(failure);
    }
    match err.into_service_error() {
        CreateTableError::ResourceInUseException(_) => None,
        CreateTableError::LimitExceededException(_) => Some(StoreError::QueryFailed(
            "Table limit exceeded".to_string(),
        )),
        CreateTableError::InternalServerError(_) => Some(StoreError::QueryFailed(
            "DynamoDB internal server error".to_string(),
        )),
        err => Some(fallback("CreateTable", err)),
    }
}

