pub mod customer;
pub mod serde;
pub mod storage;
