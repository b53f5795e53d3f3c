mod customer;

pub use customer::{CreateCustomer, SearchQuery};
