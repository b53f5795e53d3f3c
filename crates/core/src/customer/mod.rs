mod conversions;
mod error;
mod operations;
mod service;
mod types;

pub use conversions::{customer_to_row, row_to_customer, rows_to_customers};
pub use error::CustomerError;
pub use operations::{filter_by_partition_key_contains, first_name_and_email, validate_customer};
pub use service::CustomerTables;
pub use types::{CustomerRecord, CUSTOMER_COLUMNS, EMAIL_COLUMN, FIRST_NAME_COLUMN};
