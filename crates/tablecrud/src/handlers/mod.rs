pub mod customers;
pub mod error;
pub mod health;

pub use error::AppError;
