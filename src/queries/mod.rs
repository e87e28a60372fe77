//! SQL query modules.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and returns `Result<T>`.

pub mod sales;

pub use sales::SaleQuery;
