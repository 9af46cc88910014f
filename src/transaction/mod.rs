//! Transaction management for the finance application.
//!
//! This module contains the `Transaction` model and its queries, the
//! transaction data-access capability and the JSON API for transactions.

mod api;
mod core;
mod endpoints;

pub use api::{SqliteTransactionApi, TransactionApi};
pub use core::{
    NewTransaction, TIMESTAMP_FORMAT, Transaction, TransactionQuery, TransactionType,
    create_transaction, create_transaction_table,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
};
