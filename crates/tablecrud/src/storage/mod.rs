//! Table store backends.
//!
//! This module provides concrete implementations of the `TableStore` trait
//! defined in `tablecrud_core::storage`. The backend is selected at compile
//! time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): process-local store, optionally seeded with demo customers
//! - `dynamodb`: AWS DynamoDB (or DynamoDB Local) using `aws-sdk-dynamodb`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with the in-memory store (default):
//! ```bash
//! cargo build -p tablecrud
//! ```
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p tablecrud --no-default-features --features dynamodb
//! ```

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "inmemory", feature = "dynamodb"))]
compile_error!(
    "Features 'inmemory' and 'dynamodb' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p tablecrud --features inmemory"
);

// Router tests run against the in-memory store whatever the backend.
#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
