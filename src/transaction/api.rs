//! The transaction data-access capability used by the UI controllers.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::{
    Error,
    database_id::TransactionId,
    timezone::get_local_offset,
    transaction::core::{
        NewTransaction, Transaction, TransactionQuery, create_transaction, delete_transaction,
        list_transactions,
    },
};

/// Lists, creates and removes transactions.
pub trait TransactionApi: Send + Sync {
    /// Get the transactions matching `query`.
    fn list(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Record a new transaction, stamped with the current local time.
    fn create(&self, new_transaction: &NewTransaction) -> Result<Transaction, Error>;

    /// Remove a transaction.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if the transaction does not exist.
    fn remove(&self, id: TransactionId) -> Result<(), Error>;
}

/// A [TransactionApi] backed by the application's SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteTransactionApi {
    db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Moscow".
    local_timezone: String,
}

impl SqliteTransactionApi {
    /// Create a transaction API that stamps new transactions with the time in `local_timezone`.
    pub fn new(db_connection: Arc<Mutex<Connection>>, local_timezone: &str) -> Self {
        Self {
            db_connection,
            local_timezone: local_timezone.to_owned(),
        }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// The current wall-clock time in `local_timezone`.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a canonical timezone name.
pub fn local_now(local_timezone: &str) -> Result<PrimitiveDateTime, Error> {
    let offset = get_local_offset(local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {local_timezone}");
        Error::InvalidTimezoneError(local_timezone.to_owned())
    })?;
    let now = OffsetDateTime::now_utc().to_offset(offset);

    Ok(PrimitiveDateTime::new(now.date(), now.time()))
}

impl TransactionApi for SqliteTransactionApi {
    fn list(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let connection = self.connection()?;
        list_transactions(query, &connection)
    }

    fn create(&self, new_transaction: &NewTransaction) -> Result<Transaction, Error> {
        let created_at = local_now(&self.local_timezone)?;

        let connection = self.connection()?;
        create_transaction(new_transaction, created_at, &connection)
    }

    fn remove(&self, id: TransactionId) -> Result<(), Error> {
        let connection = self.connection()?;
        match delete_transaction(id, &connection)? {
            0 => Err(Error::DeleteMissingTransaction),
            _ => Ok(()),
        }
    }
}
