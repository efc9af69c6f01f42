//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `TransactionStore` interface
//! - The SQLite implementation of the store
//! - Route handlers for creating, listing, getting and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;

pub use core::{
    NewTransaction, SQLiteTransactionStore, Transaction, TransactionStore, create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::{get_transaction_endpoint, list_transactions_endpoint};
