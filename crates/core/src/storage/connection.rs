//! Parsing of the `StorageConnectionString` configuration value.
//!
//! The connection string is a `;`-separated list of `Key=Value` pairs.
//! Recognised keys:
//!
//! - `Endpoint` / `TableEndpoint`: custom service endpoint URL
//! - `Region`: service region
//! - `UseDevelopmentStorage=true`: local emulator at [`DEVELOPMENT_ENDPOINT`]
//!
//! Other keys (account names, keys, protocols) are accepted and ignored;
//! credentials come from the SDK's default provider chain.

use super::ConnectionStringError;

/// Configuration key the connection string is looked up under.
pub const CONNECTION_STRING_KEY: &str = "StorageConnectionString";

/// Endpoint used when `UseDevelopmentStorage=true`.
pub const DEVELOPMENT_ENDPOINT: &str = "http://localhost:8000";

/// Region used when the connection string names none.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection parameters for the remote table store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Custom endpoint URL (for a local emulator).
    pub endpoint_url: Option<String>,
    pub region: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl ConnectionSettings {
    /// Settings for the local development emulator.
    pub fn development() -> Self {
        Self {
            endpoint_url: Some(DEVELOPMENT_ENDPOINT.to_string()),
            region: DEFAULT_REGION.to_string(),
        }
    }

    /// Parses a connection string.
    ///
    /// Keys are matched case-insensitively; an explicit `Endpoint` or
    /// `Region` overrides the development defaults.
    pub fn parse(connection_string: &str) -> Result<Self, ConnectionStringError> {
        let segments: Vec<&str> = connection_string
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(ConnectionStringError::Empty);
        }

        let mut use_development = false;
        let mut endpoint_url = None;
        let mut region = None;

        for segment in segments {
            let (key, value) = segment
                .split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| ConnectionStringError::MalformedSegment(segment.to_string()))?;

            match key.to_ascii_lowercase().as_str() {
                "usedevelopmentstorage" => {
                    use_development = parse_bool(key, value)?;
                }
                "endpoint" | "tableendpoint" => {
                    if value.is_empty() {
                        return Err(invalid_value(key, value));
                    }
                    endpoint_url = Some(value.trim_end_matches('/').to_string());
                }
                "region" => {
                    if value.is_empty() {
                        return Err(invalid_value(key, value));
                    }
                    region = Some(value.to_string());
                }
                _ => {}
            }
        }

        let base = if use_development {
            Self::development()
        } else {
            Self::default()
        };

        Ok(Self {
            endpoint_url: endpoint_url.or(base.endpoint_url),
            region: region.unwrap_or(base.region),
        })
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local table store ({})", url),
            None => format!("Remote table store (region: {})", self.region),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConnectionStringError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid_value(key, value)),
    }
}

fn invalid_value(key: &str, value: &str) -> ConnectionStringError {
    ConnectionStringError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
