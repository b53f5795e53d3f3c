//! In-memory table store for tests and local demos.
//!
//! Every table is a `BTreeMap` keyed by `(partition_key, row_key)` behind an
//! `Arc<RwLock<_>>`, so segments come back in key order and continuation
//! tokens are simply the last key served.
//!
//! # Example
//!
//! ```rust,ignore
//! use tablecrud::storage::inmemory::InMemoryTableStore;
//!
//! let store = InMemoryTableStore::with_page_size(2);
//! // Use store for testing...
//! ```

mod store;

pub use store::InMemoryTableStore;
