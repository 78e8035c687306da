//! Models Module
//!
//! One data-access object per entity table. Each borrows a connection
//! and runs parameterized statements against it.

pub mod customers;
pub mod products;
pub mod sales;
pub mod suppliers;
pub mod types;

pub use customers::Customers;
pub use products::Products;
pub use sales::Sales;
pub use suppliers::Suppliers;
pub use types::{Customer, NewProduct, NewSupplier, Product, Sale, Supplier};
