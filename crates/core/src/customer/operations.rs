use chrono::{DateTime, Utc};

use crate::storage::Properties;

use super::error::CustomerError;
use super::types::{CustomerRecord, EMAIL_COLUMN, FIRST_NAME_COLUMN};

/// Characters the table store does not allow in key values.
const DISALLOWED_KEY_CHARS: &[char] = &['/', '\\', '#', '?'];

/// Validates a customer record before insertion.
pub fn validate_customer(record: &CustomerRecord) -> Result<(), CustomerError> {
    if record.partition_key.is_empty() {
        return Err(CustomerError::EmptyPartitionKey);
    }
    if record.row_key.is_empty() {
        return Err(CustomerError::EmptyRowKey);
    }
    check_key_characters("Partition key", &record.partition_key)?;
    check_key_characters("Row key", &record.row_key)?;
    Ok(())
}

fn check_key_characters(field: &'static str, key: &str) -> Result<(), CustomerError> {
    match key
        .chars()
        .find(|c| DISALLOWED_KEY_CHARS.contains(c) || c.is_control())
    {
        Some(character) => Err(CustomerError::DisallowedCharacter { field, character }),
        None => Ok(()),
    }
}

/// Keeps the records whose partition key contains `fragment`.
///
/// This is a substring match, not a prefix match: `"cust"` matches
/// `"customer-123"` and so does `"123"`.
pub fn filter_by_partition_key_contains(
    records: Vec<CustomerRecord>,
    fragment: &str,
) -> Vec<CustomerRecord> {
    records
        .into_iter()
        .filter(|record| record.partition_key.contains(fragment))
        .collect()
}

/// Resolves a projected row to `"{first_name},{email}"`.
///
/// Missing or non-string properties resolve to an empty field.
pub fn first_name_and_email(
    _partition_key: &str,
    _row_key: &str,
    _timestamp: Option<DateTime<Utc>>,
    properties: &Properties,
) -> String {
    let field = |name: &str| {
        properties
            .get(name)
            .and_then(|value| value.as_str())
            .unwrap_or_default()
    };
    format!("{},{}", field(FIRST_NAME_COLUMN), field(EMAIL_COLUMN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PropertyValue;

    #[test]
    fn test_validate_customer_ok() {
        let record = CustomerRecord::new("customer-123", "ada@x.com", "Ada", "ada@x.com");
        assert_eq!(validate_customer(&record), Ok(()));
    }

    #[test]
    fn test_validate_customer_empty_keys() {
        let record = CustomerRecord::new("", "1", "Ada", "ada@x.com");
        assert_eq!(
            validate_customer(&record),
            Err(CustomerError::EmptyPartitionKey)
        );

        let record = CustomerRecord::new("customer-123", "", "Ada", "ada@x.com");
        assert_eq!(validate_customer(&record), Err(CustomerError::EmptyRowKey));
    }

    #[test]
    fn test_validate_customer_disallowed_characters() {
        let record = CustomerRecord::new("customer/123", "1", "Ada", "ada@x.com");
        assert_eq!(
            validate_customer(&record),
            Err(CustomerError::DisallowedCharacter {
                field: "Partition key",
                character: '/',
            })
        );

        let record = CustomerRecord::new("customer-123", "row\n1", "Ada", "ada@x.com");
        assert_eq!(
            validate_customer(&record),
            Err(CustomerError::DisallowedCharacter {
                field: "Row key",
                character: '\n',
            })
        );
    }

    #[test]
    fn test_filter_is_substring_not_prefix() {
        let records = vec![
            CustomerRecord::new("customer-123", "1", "Ada", "ada@x.com"),
            CustomerRecord::new("vip-customer", "2", "Grace", "grace@x.com"),
            CustomerRecord::new("supplier-9", "3", "Linus", "linus@x.com"),
        ];

        let matched = filter_by_partition_key_contains(records.clone(), "cust");
        let keys: Vec<&str> = matched.iter().map(|r| r.partition_key.as_str()).collect();
        assert_eq!(keys, vec!["customer-123", "vip-customer"]);

        let matched = filter_by_partition_key_contains(records, "123");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].first_name, "Ada");
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let records = vec![CustomerRecord::new("customer-123", "1", "Ada", "ada@x.com")];
        assert!(filter_by_partition_key_contains(records, "CUST").is_empty());
    }

    #[test]
    fn test_first_name_and_email() {
        let mut properties = Properties::new();
        properties.insert("FirstName".to_string(), PropertyValue::from("Ada"));
        properties.insert("Email".to_string(), PropertyValue::from("ada@x.com"));

        assert_eq!(
            first_name_and_email("customer-123", "1", None, &properties),
            "Ada,ada@x.com"
        );
    }

    #[test]
    fn test_first_name_and_email_missing_fields() {
        let mut properties = Properties::new();
        properties.insert("Email".to_string(), PropertyValue::Int64(7));

        assert_eq!(first_name_and_email("pk", "rk", None, &properties), ",");
    }
}
