//! The JSON data API for accounts.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Form,
    extract::{FromRef, Path, Query, State},
    response::Response,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    account::core::{AccountFilter, create_account, delete_account, get_account, list_accounts},
    api_response::respond,
    database_id::AccountId,
};

/// The state needed by the account API.
#[derive(Debug, Clone)]
pub struct AccountApiState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating an account.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountForm {
    pub name: String,
}

impl AccountApiState {
    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// A route handler that lists accounts, optionally filtered by name.
pub async fn list_accounts_endpoint(
    State(state): State<AccountApiState>,
    Query(filter): Query<AccountFilter>,
) -> Response {
    respond(
        state
            .connection()
            .and_then(|connection| list_accounts(Some(&filter), &connection)),
    )
}

/// A route handler for creating an account.
pub async fn create_account_endpoint(
    State(state): State<AccountApiState>,
    Form(form): Form<AccountForm>,
) -> Response {
    respond(
        state
            .connection()
            .and_then(|connection| create_account(&form.name, &connection)),
    )
}

/// A route handler for getting a single account.
pub async fn get_account_endpoint(
    State(state): State<AccountApiState>,
    Path(account_id): Path<AccountId>,
) -> Response {
    respond(
        state
            .connection()
            .and_then(|connection| get_account(account_id, &connection)),
    )
}

/// A route handler for deleting an account and its transactions.
pub async fn delete_account_endpoint(
    State(state): State<AccountApiState>,
    Path(account_id): Path<AccountId>,
) -> Response {
    let result = state.connection().and_then(|connection| {
        match delete_account(account_id, &connection) {
            Ok(0) => Err(Error::DeleteMissingAccount),
            Ok(_) => Ok(()),
            Err(error) => {
                tracing::error!("Could not delete account {account_id}: {error}");
                Err(error)
            }
        }
    });

    respond(result)
}
