//! Application state shared by all request handlers.
//!
//! The store backend is chosen by feature flag; each backend module below
//! provides its own `AppState::new`.

use std::sync::Arc;

use tablecrud_core::customer::CustomerTables;
use tablecrud_core::storage::{cancel_pair, CancelHandle, CancelSignal, TableStore};

use crate::config::Config;

/// Shared application state.
///
/// This is cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Customer data access over the active store.
    pub customers: CustomerTables,
    /// Table the customer routes operate on.
    pub table: Arc<str>,
    /// Cancels long-running listings on shutdown.
    shutdown: CancelHandle,
}

impl AppState {
    /// Creates a new AppState over the given store.
    pub fn build(store: Arc<dyn TableStore>, config: &Config) -> Self {
        let (shutdown, _) = cancel_pair();

        Self {
            customers: CustomerTables::new(store),
            table: Arc::from(config.table_name.as_str()),
            shutdown,
        }
    }

    /// Returns a signal that fires when the server shuts down.
    pub fn shutdown_signal(&self) -> CancelSignal {
        self.shutdown.signal()
    }

    /// Cancels every in-flight paginated listing.
    pub fn signal_shutdown(&self) {
        tracing::debug!("Cancelling in-flight listings");
        self.shutdown.cancel();
    }
}

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::mock_data::demo_customers;
    use crate::storage::inmemory::InMemoryTableStore;

    impl AppState {
        /// Creates AppState with the in-memory store.
        /// Seeds demo customers when `SEED_DEMO_DATA` is enabled.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(InMemoryTableStore::with_page_size(config.page_size));
            let state = Self::build(store, config);

            if config.seed_demo_data {
                let customers = demo_customers();
                for customer in &customers {
                    state.customers.insert(&state.table, customer).await?;
                }
                tracing::info!(
                    table = %state.table,
                    rows = customers.len(),
                    "Seeded demo customers"
                );
            }

            Ok(state)
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb {
    use super::*;
    use crate::storage::dynamodb::DynamoDbTableStore;
    use tablecrud_core::storage::ConnectionSettings;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        ///
        /// Without a `StorageConnectionString` the AWS defaults are used.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let settings = match &config.storage_connection_string {
                Some(connection_string) => ConnectionSettings::parse(connection_string)?,
                None => ConnectionSettings::default(),
            };

            let store =
                Arc::new(DynamoDbTableStore::from_settings(&settings, config.page_size).await);

            Ok(Self::build(store, config))
        }
    }
}
