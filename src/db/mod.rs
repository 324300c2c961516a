mod database;
mod transaction;

pub use database::{CUSTOMER_DDL, Database};
pub use transaction::{ClearCustomers, CountCustomers, TransactionCallback};
