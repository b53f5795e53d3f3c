//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the `TableStore`
//! trait using `aws-sdk-dynamodb`. Point it at DynamoDB Local with
//! `StorageConnectionString=UseDevelopmentStorage=true`.

mod conversions;
mod error;
mod schema;
mod store;

pub use store::DynamoDbTableStore;
