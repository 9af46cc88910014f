//! The JSON data API for transactions.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::Response,
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    api_response::respond,
    database_id::TransactionId,
    transaction::{
        api::local_now,
        core::{
            NewTransaction, TransactionQuery, create_transaction, delete_transaction,
            list_transactions,
        },
    },
};

/// The state needed by the transaction API.
#[derive(Debug, Clone)]
pub struct TransactionApiState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Moscow".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl TransactionApiState {
    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// A route handler that lists the transactions of one account.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionApiState>,
    Query(query): Query<TransactionQuery>,
) -> Response {
    respond(
        state
            .connection()
            .and_then(|connection| list_transactions(&query, &connection)),
    )
}

/// A route handler for creating a transaction stamped with the current local time.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Form(form): Form<NewTransaction>,
) -> Response {
    let result = local_now(&state.local_timezone).and_then(|created_at| {
        let connection = state.connection()?;
        create_transaction(&form, created_at, &connection)
    });

    respond(result)
}

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let result = state.connection().and_then(|connection| {
        match delete_transaction(transaction_id, &connection) {
            Ok(0) => Err(Error::DeleteMissingTransaction),
            Ok(_) => Ok(()),
            Err(error) => {
                tracing::error!("Could not delete transaction {transaction_id}: {error}");
                Err(error)
            }
        }
    });

    respond(result)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        routing::{delete, get},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        account::create_account,
        api_response::ApiResponse,
        db::initialize,
        endpoints::{self, format_endpoint},
        transaction::{NewTransaction, Transaction, TransactionType},
    };

    use super::{
        TransactionApiState, create_transaction_endpoint, delete_transaction_endpoint,
        list_transactions_endpoint,
    };

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_account("Card", &connection).unwrap();
        let state = TransactionApiState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let app = Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                get(list_transactions_endpoint).post(create_transaction_endpoint),
            )
            .route(endpoints::TRANSACTION_API, delete(delete_transaction_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn salary() -> NewTransaction {
        NewTransaction {
            type_: TransactionType::Income,
            name: "Salary".to_owned(),
            sum: 1500.0,
            account_id: 1,
        }
    }

    #[tokio::test]
    async fn create_and_list_transactions() {
        let server = get_test_server();

        let created = server.post(endpoints::TRANSACTIONS_API).form(&salary()).await;
        created.assert_status_ok();
        let created: ApiResponse<Transaction> = created.json();
        let created = created.data.expect("want created transaction in response");

        let listed = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("account_id", 1)
            .await;

        listed.assert_status_ok();
        let listed: ApiResponse<Vec<Transaction>> = listed.json();
        assert_eq!(listed.data, Some(vec![created]));
    }

    #[tokio::test]
    async fn create_for_missing_account_is_bad_request() {
        let server = get_test_server();
        let mut form = salary();
        form.account_id = 42;

        server
            .post(endpoints::TRANSACTIONS_API)
            .form(&form)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn delete_transaction_twice() {
        let server = get_test_server();
        server.post(endpoints::TRANSACTIONS_API).form(&salary()).await;
        let url = format_endpoint(endpoints::TRANSACTION_API, 1);

        server.delete(&url).await.assert_status_ok();
        server.delete(&url).await.assert_status_not_found();
    }
}
