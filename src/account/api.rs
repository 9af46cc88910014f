//! The account data-access capability used by the UI controllers.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    account::core::{Account, AccountFilter, delete_account, get_account, list_accounts},
    database_id::AccountId,
};

/// Lists, looks up and removes accounts.
pub trait AccountApi: Send + Sync {
    /// Get all accounts, optionally narrowed down by `filter`.
    fn list(&self, filter: Option<&AccountFilter>) -> Result<Vec<Account>, Error>;

    /// Get a single account.
    fn get(&self, id: AccountId) -> Result<Account, Error>;

    /// Remove an account and its transactions.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingAccount] if the account does not exist.
    fn remove(&self, id: AccountId) -> Result<(), Error>;
}

/// An [AccountApi] backed by the application's SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteAccountApi {
    db_connection: Arc<Mutex<Connection>>,
}

impl SqliteAccountApi {
    /// Create an account API that shares `db_connection` with the rest of the app.
    pub fn new(db_connection: Arc<Mutex<Connection>>) -> Self {
        Self { db_connection }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl AccountApi for SqliteAccountApi {
    fn list(&self, filter: Option<&AccountFilter>) -> Result<Vec<Account>, Error> {
        let connection = self.connection()?;
        list_accounts(filter, &connection)
    }

    fn get(&self, id: AccountId) -> Result<Account, Error> {
        let connection = self.connection()?;
        get_account(id, &connection)
    }

    fn remove(&self, id: AccountId) -> Result<(), Error> {
        let connection = self.connection()?;
        match delete_account(id, &connection)? {
            0 => Err(Error::DeleteMissingAccount),
            _ => Ok(()),
        }
    }
}
