mod cancel;
mod connection;
mod error;
mod http_mapping;
mod pagination;
mod traits;
mod types;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use connection::{
    ConnectionSettings, CONNECTION_STRING_KEY, DEFAULT_REGION, DEVELOPMENT_ENDPOINT,
};
pub use error::{ConnectionStringError, Result, StoreError};
pub use http_mapping::store_error_to_status_code;
pub use pagination::fetch_all;
pub use traits::TableStore;
pub use types::{
    validate_table_name, ColumnSelection, ContinuationToken, Page, Properties, PropertyValue,
    TableQuery, TableRow, MAX_PAGE_SIZE, PARTITION_KEY_COLUMN, ROW_KEY_COLUMN, TIMESTAMP_COLUMN,
};
