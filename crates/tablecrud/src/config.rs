use std::env;

use tablecrud_core::storage::{CONNECTION_STRING_KEY, MAX_PAGE_SIZE};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw `StorageConnectionString` value, if set.
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub storage_connection_string: Option<String>,
    /// Table holding the customers (default: "customer")
    pub table_name: String,
    /// Rows per store segment (default: 1,000, capped at 1,000)
    pub page_size: usize,
    /// Seed demo customers into the in-memory store (default: true)
    /// Note: Only used when the `inmemory` feature is enabled.
    #[allow(dead_code)]
    pub seed_demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `StorageConnectionString` - Table store connection string (no default)
    /// - `CUSTOMER_TABLE` - Customer table name (default: "customer")
    /// - `TABLE_PAGE_SIZE` - Rows per segment, 1 to 1,000 (default: 1,000)
    /// - `SEED_DEMO_DATA` - Seed demo customers in memory: `true`/`false` or `1`/`0` (default: true)
    pub fn from_env() -> Self {
        Self {
            storage_connection_string: env::var(CONNECTION_STRING_KEY)
                .ok()
                .filter(|v| !v.trim().is_empty()),
            table_name: env::var("CUSTOMER_TABLE").unwrap_or_else(|_| "customer".to_string()),
            page_size: env::var("TABLE_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(MAX_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }
}

/// Parses a boolean flag, case-insensitive. Unrecognized values yield None.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var(CONNECTION_STRING_KEY);
        env::remove_var("CUSTOMER_TABLE");
        env::remove_var("TABLE_PAGE_SIZE");
        env::remove_var("SEED_DEMO_DATA");

        let config = Config::from_env();

        assert_eq!(config.storage_connection_string, None);
        assert_eq!(config.table_name, "customer");
        assert_eq!(config.page_size, 1_000);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn test_seed_flag_accepts_numbers_and_words() {
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("yes"), None);
    }
}
