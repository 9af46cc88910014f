//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/accounts/{account_id}', use [format_endpoint].

/// The root route which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page for displaying the transactions of an account.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The transactions page fragment, re-rendered after changes elsewhere in the app.
pub const TRANSACTIONS_PAGE_FRAGMENT: &str = "/transactions/page";
/// The delegated click handler for the transactions page.
pub const TRANSACTIONS_PAGE_CLICK: &str = "/transactions/page/click";
/// The accounts widget fragment, also used to create accounts.
pub const ACCOUNTS_WIDGET: &str = "/widgets/accounts";
/// The modal form for creating a transaction.
pub const CREATE_TRANSACTION_FORM: &str = "/forms/create-transaction";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to list and create accounts.
pub const ACCOUNTS_API: &str = "/api/accounts";
/// The route to get and delete a single account.
pub const ACCOUNT_API: &str = "/api/accounts/{account_id}";
/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to delete a single transaction.
pub const TRANSACTION_API: &str = "/api/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/accounts/{account_id}', '{account_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// The URL of the transactions page for the account `account_id`.
pub fn transactions_view_for(account_id: i64) -> String {
    match serde_urlencoded::to_string([("account_id", account_id)]) {
        Ok(query) => format!("{TRANSACTIONS_VIEW}?{query}"),
        Err(error) => {
            tracing::error!("Could not encode account ID {account_id}: {error}");
            TRANSACTIONS_VIEW.to_owned()
        }
    }
}
