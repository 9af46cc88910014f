//! Route handlers that host the page and form controllers for the browser.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HX_TRIGGER_AFTER_SWAP;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::accounts_widget_loader,
    alert::Alert,
    database_id::AccountId,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base},
    transaction::{NewTransaction, TransactionQuery},
    ui::{
        collaborators::ClientEvents,
        transactions_page::{ClickTarget, PageElement, RenderJob, TransactionsPage},
        workspace::Workspace,
    },
};

/// The state needed by the page and form route handlers.
#[derive(Clone)]
pub struct UiState {
    workspace: Arc<Mutex<Workspace>>,
    events: Arc<ClientEvents>,
}

impl FromRef<AppState> for UiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            workspace: state.workspace.clone(),
            events: state.events.clone(),
        }
    }
}

impl UiState {
    fn workspace(&self) -> Result<MutexGuard<'_, Workspace>, Error> {
        self.workspace
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire workspace lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    /// Run `job` off the async runtime without holding the workspace lock,
    /// then apply its result to the page.
    async fn run_render_job(&self, job: Option<RenderJob>) -> Result<(), Error> {
        let Some(job) = job else {
            return Ok(());
        };

        let account_id = job.options().account_id;
        let fetched = tokio::task::spawn_blocking(move || job.run())
            .await
            .map_err(|error| {
                tracing::error!("Render of account {account_id} did not finish: {error}");
                Error::TaskJoinError(error.to_string())
            })?;

        self.workspace()?.page.apply(fetched)
    }
}

/// Attach the client events raised while handling the request to `response`.
///
/// The events fire after htmx has swapped in the response, so the swapped in
/// elements are the ones that react to them.
fn with_client_events(events: &ClientEvents, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();

    if let Some(value) = events.drain_header_value() {
        response.headers_mut().insert(HX_TRIGGER_AFTER_SWAP, value);
    }

    response
}

/// The query string of the transactions page.
#[derive(Debug, Deserialize)]
pub struct TransactionsViewQuery {
    /// The account to show. The page shows what it showed last if this is missing.
    pub account_id: Option<AccountId>,
}

/// Render the full transactions page, showing the account in the query if there is one.
pub async fn get_transactions_view(
    State(state): State<UiState>,
    Query(query): Query<TransactionsViewQuery>,
) -> Response {
    let options = query
        .account_id
        .map(|account_id| TransactionQuery { account_id });

    let job = match state.workspace() {
        Ok(mut workspace) => workspace.page.begin_render(options),
        Err(error) => return error.into_response(),
    };

    if let Err(error) = state.run_render_job(job).await {
        return error.into_response();
    }

    match state.workspace() {
        Ok(workspace) => transactions_view(&workspace.page).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Render the transactions page again with its last query and return it as a fragment.
pub async fn get_transactions_page_fragment(State(state): State<UiState>) -> Response {
    let job = match state.workspace() {
        Ok(mut workspace) => workspace.page.begin_update(),
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = state.run_render_job(job).await {
        return error.into_alert_response();
    }

    match state.workspace() {
        Ok(workspace) => workspace.page.markup().into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Handle a click inside the transactions page and return the page as a fragment.
pub async fn click_transactions_page(
    State(state): State<UiState>,
    Form(target): Form<ClickTarget>,
) -> Response {
    let mut workspace = match state.workspace() {
        Ok(workspace) => workspace,
        Err(error) => return error.into_alert_response(),
    };

    // The events are drained while the workspace is locked so that they are
    // sent back with the request that raised them.
    match workspace.page.handle_click(&target) {
        Ok(()) => with_client_events(&state.events, workspace.page.markup()),
        Err(error) => {
            state.events.drain();
            error.into_alert_response()
        }
    }
}

/// Bind a fresh create transaction form and return it as a fragment.
pub async fn get_create_transaction_form(State(state): State<UiState>) -> Response {
    let mut workspace = match state.workspace() {
        Ok(workspace) => workspace,
        Err(error) => return error.into_alert_response(),
    };

    workspace.bind_form();

    workspace.form.element().markup().into_response()
}

/// Submit the create transaction form.
///
/// Responds with the reset form and a success alert, or with an error alert
/// if the transaction could not be created.
pub async fn submit_create_transaction_form(
    State(state): State<UiState>,
    Form(data): Form<NewTransaction>,
) -> Response {
    let mut workspace = match state.workspace() {
        Ok(workspace) => workspace,
        Err(error) => return error.into_alert_response(),
    };

    workspace.form.element_mut().fill(&data);

    match workspace.form.on_submit(&data) {
        Ok(transaction) => {
            let alert = Alert::SuccessSimple {
                message: format!("Транзакция «{}» добавлена", transaction.name),
            };
            let content = html! {
                (workspace.form.element().markup())
                (alert.into_oob_markup())
            };

            with_client_events(&state.events, content)
        }
        Err(error) => {
            state.events.drain();
            error.into_alert_response()
        }
    }
}

fn transactions_view(page: &TransactionsPage<PageElement>) -> Markup {
    let content = html! {
        nav class="navbar navbar-default"
        {
            div class=(PAGE_CONTAINER_STYLE)
            {
                a class="navbar-brand" href=(endpoints::ROOT) { "Coffer" }

                button
                    type="button"
                    class={ (BUTTON_PRIMARY_STYLE) " navbar-btn pull-right" }
                    data-modal-open="create-transaction-modal"
                    hx-get=(endpoints::CREATE_TRANSACTION_FORM)
                    hx-target="#create-transaction-form-container"
                    hx-swap="innerHTML"
                {
                    span class="fa fa-plus" {}
                    " Новая транзакция"
                }
            }
        }

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="row"
            {
                div class="col-md-3" { (accounts_widget_loader()) }
                div class="col-md-9" { (page.markup()) }
            }
        }

        dialog id="create-transaction-modal" class="modal-content"
        {
            div class="modal-header"
            {
                button type="button" class="close" data-modal-close aria-label="Закрыть"
                {
                    span aria-hidden="true" { "×" }
                }
                h4 class="modal-title" { "Новая транзакция" }
            }

            div id="create-transaction-form-container" class="modal-body" {}
        }
    };

    base("Транзакции", &content)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        extract::{Query, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use axum_htmx::HX_TRIGGER_AFTER_SWAP;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        AppState,
        account::create_account,
        test_utils::{
            assert_content_type, assert_status_ok, assert_valid_html, parse_html_document,
            parse_html_fragment,
        },
        transaction::{NewTransaction, TransactionType, create_transaction},
        ui::ClickTarget,
    };

    use super::{
        TransactionsViewQuery, UiState, click_transactions_page, get_create_transaction_form,
        get_transactions_page_fragment, get_transactions_view, submit_create_transaction_form,
    };

    fn get_test_state() -> (AppState, UiState) {
        let connection = Connection::open_in_memory().unwrap();
        crate::db::initialize(&connection).unwrap();
        let card = create_account("Карта", &connection).unwrap();
        create_account("Наличные", &connection).unwrap();
        for (name, created_at) in [
            ("Кофе", datetime!(2024-05-01 08:30:00)),
            ("Обед", datetime!(2024-05-02 13:00:00)),
        ] {
            create_transaction(
                &NewTransaction {
                    type_: TransactionType::Expense,
                    name: name.to_owned(),
                    sum: 10.0,
                    account_id: card.id,
                },
                created_at,
                &connection,
            )
            .unwrap();
        }

        let app_state = AppState::new(connection, "Etc/UTC").unwrap();
        let ui_state = axum::extract::FromRef::from_ref(&app_state);

        (app_state, ui_state)
    }

    fn select_count(html: &Html, selector: &str) -> usize {
        html.select(&Selector::parse(selector).unwrap()).count()
    }

    fn select_text(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No element matching {selector}"))
            .text()
            .collect()
    }

    fn trigger_header(response: &axum::response::Response<Body>) -> Option<String> {
        response
            .headers()
            .get(HX_TRIGGER_AFTER_SWAP)
            .map(|value| value.to_str().unwrap().to_owned())
    }

    async fn open_account(state: &UiState, account_id: i64) {
        let response = get_transactions_view(
            State(state.clone()),
            Query(TransactionsViewQuery {
                account_id: Some(account_id),
            }),
        )
        .await;
        assert_status_ok(&response);
    }

    #[tokio::test]
    async fn full_page_renders_account() {
        let (_, state) = get_test_state();

        let response = get_transactions_view(
            State(state),
            Query(TransactionsViewQuery {
                account_id: Some(1),
            }),
        )
        .await;

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_text(&html, ".content-title"), "Карта");
        assert_eq!(select_count(&html, ".content .transaction"), 2);
        assert_eq!(select_count(&html, "#accounts-widget"), 1);
        assert_eq!(select_count(&html, "#create-transaction-modal"), 1);
    }

    #[tokio::test]
    async fn full_page_for_missing_account_is_not_found() {
        let (_, state) = get_test_state();

        let response = get_transactions_view(
            State(state),
            Query(TransactionsViewQuery {
                account_id: Some(42),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn full_page_without_account_shows_placeholder() {
        let (_, state) = get_test_state();

        let response =
            get_transactions_view(State(state), Query(TransactionsViewQuery { account_id: None }))
                .await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_eq!(select_text(&html, ".content-title"), "Название счета");
        assert_eq!(select_count(&html, ".content .transaction"), 0);
    }

    #[tokio::test]
    async fn fragment_renders_last_account_again() {
        let (_, state) = get_test_state();
        open_account(&state, 1).await;

        let response = get_transactions_page_fragment(State(state)).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_eq!(select_count(&html, "#transactions-page"), 1);
        assert_eq!(select_count(&html, ".content .transaction"), 2);
    }

    #[tokio::test]
    async fn clicking_remove_transaction_triggers_update() {
        let (_, state) = get_test_state();
        open_account(&state, 1).await;

        let response = click_transactions_page(
            State(state.clone()),
            Form(ClickTarget {
                class: "btn btn-danger transaction__remove".to_owned(),
                button_class: Some("btn btn-danger transaction__remove".to_owned()),
                button_id: Some("1".to_owned()),
                ..Default::default()
            }),
        )
        .await;

        assert_status_ok(&response);
        assert_eq!(trigger_header(&response).as_deref(), Some("app:update"));

        let response = get_transactions_page_fragment(State(state)).await;
        let html = parse_html_fragment(response).await;
        assert_eq!(select_count(&html, ".content .transaction"), 1);
    }

    #[tokio::test]
    async fn clicking_remove_account_clears_page() {
        let (_, state) = get_test_state();
        open_account(&state, 1).await;

        let response = click_transactions_page(
            State(state),
            Form(ClickTarget {
                class: "btn btn-danger remove-account".to_owned(),
                account_id: Some(1),
                ..Default::default()
            }),
        )
        .await;

        assert_status_ok(&response);
        assert_eq!(
            trigger_header(&response).as_deref(),
            Some("app:update-widgets")
        );
        let html = parse_html_fragment(response).await;
        assert_eq!(select_text(&html, ".content-title"), "Название счета");
        assert_eq!(select_count(&html, ".content .transaction"), 0);
    }

    #[tokio::test]
    async fn remove_account_from_a_page_showing_another_account_is_refused() {
        let (app_state, state) = get_test_state();
        open_account(&state, 1).await;
        open_account(&state, 2).await;

        let response = click_transactions_page(
            State(state.clone()),
            Form(ClickTarget {
                class: "btn btn-danger remove-account".to_owned(),
                account_id: Some(1),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(trigger_header(&response), None);
        let html = parse_html_fragment(response).await;
        assert_eq!(select_count(&html, ".alert-danger"), 1);

        let connection = app_state.db_connection.lock().unwrap();
        let remaining: i64 = connection
            .query_row("SELECT COUNT(*) FROM account", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 2, "no account should be removed");
        drop(connection);

        let workspace = state.workspace().unwrap();
        assert_eq!(
            workspace.page.last_options().map(|options| options.account_id),
            Some(2)
        );
    }

    #[tokio::test]
    async fn missing_account_is_not_refreshed_afterwards() {
        let (_, state) = get_test_state();
        open_account(&state, 1).await;

        let response = get_transactions_view(
            State(state.clone()),
            Query(TransactionsViewQuery {
                account_id: Some(42),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get_transactions_page_fragment(State(state)).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_eq!(select_text(&html, ".content-title"), "Название счета");
        assert_eq!(select_count(&html, ".remove-account[disabled]"), 1);
    }

    #[tokio::test]
    async fn clicking_remove_missing_transaction_shows_alert() {
        let (_, state) = get_test_state();
        open_account(&state, 1).await;

        let response = click_transactions_page(
            State(state),
            Form(ClickTarget {
                button_class: Some("transaction__remove".to_owned()),
                button_id: Some("999".to_owned()),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(trigger_header(&response), None);
        let html = parse_html_fragment(response).await;
        assert_eq!(select_count(&html, ".alert-danger"), 1);
    }

    #[tokio::test]
    async fn form_lists_accounts() {
        let (_, state) = get_test_state();

        let response = get_create_transaction_form(State(state)).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_eq!(select_count(&html, "select.accounts-select option"), 2);
    }

    #[tokio::test]
    async fn submitting_form_closes_modal_and_updates() {
        let (_, state) = get_test_state();
        get_create_transaction_form(State(state.clone())).await;

        let response = submit_create_transaction_form(
            State(state),
            Form(NewTransaction {
                type_: TransactionType::Income,
                name: "Зарплата".to_owned(),
                sum: 1500.0,
                account_id: 2,
            }),
        )
        .await;

        assert_status_ok(&response);
        assert_eq!(
            trigger_header(&response).as_deref(),
            Some("modal:close, app:update")
        );
        let html = parse_html_fragment(response).await;
        let name = html
            .select(&Selector::parse("input[name=name]").unwrap())
            .next()
            .expect("No name input");
        assert_eq!(name.value().attr("value"), Some(""));
        assert_eq!(select_count(&html, "#alert-container .alert-success"), 1);
    }

    #[tokio::test]
    async fn submitting_invalid_form_shows_alert() {
        let (_, state) = get_test_state();

        let response = submit_create_transaction_form(
            State(state),
            Form(NewTransaction {
                type_: TransactionType::Expense,
                name: "   ".to_owned(),
                sum: 1.0,
                account_id: 1,
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(trigger_header(&response), None);
    }
}
