//! The accounts widget: every account with its balance, and a form for adding accounts.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{
        core::{AccountSummary, create_account, get_account_summaries},
        endpoints::AccountForm,
    },
    endpoints::{self, transactions_view_for},
    html::{BUTTON_PRIMARY_STYLE, CURRENCY_SIGN, FORM_TEXT_INPUT_STYLE, format_sum},
};

/// Refresh the widget after the app is updated, or when only widgets need refreshing.
const REFRESH_TRIGGER: &str = "app:update from:body, app:update-widgets from:body";

/// The state needed for the accounts widget.
#[derive(Debug, Clone)]
pub struct AccountsWidgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsWidgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl AccountsWidgetState {
    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// An empty widget that loads itself once it is on the page.
pub fn accounts_widget_loader() -> Markup {
    html! {
        aside
            id="accounts-widget"
            class="accounts-widget"
            hx-get=(endpoints::ACCOUNTS_WIDGET)
            hx-trigger={ "load, " (REFRESH_TRIGGER) }
            hx-swap="outerHTML"
        {}
    }
}

fn accounts_widget_view(accounts: &[AccountSummary]) -> Markup {
    html! {
        aside
            id="accounts-widget"
            class="accounts-widget panel panel-default"
            hx-get=(endpoints::ACCOUNTS_WIDGET)
            hx-trigger=(REFRESH_TRIGGER)
            hx-swap="outerHTML"
        {
            div class="panel-heading"
            {
                h3 class="panel-title" { "Счета" }
            }

            div class="list-group"
            {
                @for account in accounts {
                    a class="list-group-item" href=(transactions_view_for(account.id))
                    {
                        span class="badge" { (format_sum(account.balance)) " " (CURRENCY_SIGN) }
                        (account.name)
                    }
                }

                @if accounts.is_empty() {
                    p class="list-group-item text-muted" { "Счетов пока нет." }
                }
            }

            div class="panel-footer"
            {
                form
                    hx-post=(endpoints::ACCOUNTS_WIDGET)
                    hx-target="#accounts-widget"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                {
                    div class="input-group"
                    {
                        input
                            type="text"
                            name="name"
                            class=(FORM_TEXT_INPUT_STYLE)
                            placeholder="Новый счёт"
                            required;

                        span class="input-group-btn"
                        {
                            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Добавить" }
                        }
                    }
                }
            }
        }
    }
}

/// Render the accounts widget.
pub async fn get_accounts_widget(State(state): State<AccountsWidgetState>) -> Response {
    match state
        .connection()
        .and_then(|connection| get_account_summaries(&connection))
    {
        Ok(accounts) => accounts_widget_view(&accounts).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Create an account from the widget's form and render the widget again.
pub async fn create_account_from_widget(
    State(state): State<AccountsWidgetState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state.connection() {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    let result = create_account(&form.name, &connection)
        .inspect(|account| tracing::info!("Created account {} \"{}\"", account.id, account.name))
        .and_then(|_| get_account_summaries(&connection));

    match result {
        Ok(accounts) => accounts_widget_view(&accounts).into_response(),
        Err(error) => error.into_alert_response(),
    }
}
