use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column holding the customer's first name.
pub const FIRST_NAME_COLUMN: &str = "FirstName";
/// Column holding the customer's email address.
pub const EMAIL_COLUMN: &str = "Email";

/// Every column a customer row is known to carry.
pub const CUSTOMER_COLUMNS: &[&str] = &[
    crate::storage::PARTITION_KEY_COLUMN,
    crate::storage::ROW_KEY_COLUMN,
    crate::storage::TIMESTAMP_COLUMN,
    FIRST_NAME_COLUMN,
    EMAIL_COLUMN,
];

/// A customer stored in a table.
///
/// `(partition_key, row_key)` identifies the record within its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub partition_key: String,
    pub row_key: String,
    pub first_name: String,
    pub email: String,
    /// Concurrency token supplied by the store. Never interpreted.
    pub version_tag: Option<String>,
    /// Last-modified time supplied by the store.
    pub timestamp: Option<DateTime<Utc>>,
}

impl CustomerRecord {
    /// Creates a new, not yet stored customer record.
    pub fn new(
        partition_key: impl Into<String>,
        row_key: impl Into<String>,
        first_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            first_name: first_name.into(),
            email: email.into(),
            version_tag: None,
            timestamp: None,
        }
    }

    /// Returns true if `other` carries the same key and customer fields,
    /// ignoring store-assigned metadata.
    pub fn same_customer(&self, other: &CustomerRecord) -> bool {
        self.partition_key == other.partition_key
            && self.row_key == other.row_key
            && self.first_name == other.first_name
            && self.email == other.email
    }
}
