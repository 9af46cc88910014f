//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    account::SqliteAccountApi,
    db::initialize,
    transaction::SqliteTransactionApi,
    ui::{ClientEvents, Collaborators, ConfirmedByClient, Workspace},
};

/// The state of the web server.
#[derive(Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Europe/Moscow".
    pub local_timezone: String,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The transactions page and create transaction form served to the browser.
    pub workspace: Arc<Mutex<Workspace>>,

    /// The client events raised by the controllers in [AppState::workspace].
    pub events: Arc<ClientEvents>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Europe/Moscow".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));
        let events = Arc::new(ClientEvents::new());
        let collaborators = Collaborators {
            accounts: Arc::new(SqliteAccountApi::new(connection.clone())),
            transactions: Arc::new(SqliteTransactionApi::new(
                connection.clone(),
                local_timezone,
            )),
            app: events.clone(),
            modal: events.clone(),
            confirm: Arc::new(ConfirmedByClient),
        };
        let workspace = Workspace::new(collaborators)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            db_connection: connection,
            workspace: Arc::new(Mutex::new(workspace)),
            events,
        })
    }
}
