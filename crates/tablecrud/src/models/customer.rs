use serde::Deserialize;

use tablecrud_core::customer::CustomerRecord;
use tablecrud_core::serde::{deserialize_optional_string, deserialize_trimmed_string};

/// Form payload for adding a customer (POST /customers).
#[derive(Debug, Deserialize)]
pub struct CreateCustomer {
    #[serde(deserialize_with = "deserialize_trimmed_string")]
    pub partition_key: String,
    #[serde(deserialize_with = "deserialize_trimmed_string")]
    pub row_key: String,
    #[serde(deserialize_with = "deserialize_trimmed_string")]
    pub first_name: String,
    #[serde(deserialize_with = "deserialize_trimmed_string")]
    pub email: String,
}

impl CreateCustomer {
    /// Converts the form into a not yet stored record.
    pub fn into_record(self) -> CustomerRecord {
        CustomerRecord::new(self.partition_key, self.row_key, self.first_name, self.email)
    }
}

/// Query string for GET /customers/search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Fragment the partition key must contain. Missing or blank matches everything.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
}

impl SearchQuery {
    pub fn fragment(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}
