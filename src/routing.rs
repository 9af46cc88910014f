//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{
        create_account_endpoint, create_account_from_widget, delete_account_endpoint,
        get_account_endpoint, get_accounts_widget, list_accounts_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    },
    ui::{
        click_transactions_page, get_create_transaction_form, get_transactions_page_fragment,
        get_transactions_view, submit_create_transaction_form,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_view))
        .route(
            endpoints::TRANSACTIONS_PAGE_FRAGMENT,
            get(get_transactions_page_fragment),
        )
        .route(
            endpoints::TRANSACTIONS_PAGE_CLICK,
            post(click_transactions_page),
        )
        .route(
            endpoints::ACCOUNTS_WIDGET,
            get(get_accounts_widget).post(create_account_from_widget),
        )
        .route(
            endpoints::CREATE_TRANSACTION_FORM,
            get(get_create_transaction_form).post(submit_create_transaction_form),
        );

    let api_routes = Router::new()
        .route(
            endpoints::ACCOUNTS_API,
            get(list_accounts_endpoint).post(create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT_API,
            get(get_account_endpoint).delete(delete_account_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_API,
            delete(delete_transaction_endpoint),
        );

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}
