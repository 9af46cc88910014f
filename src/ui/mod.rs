//! The transactions page and create transaction form controllers, and the
//! route handlers that serve them to the browser.
//!
//! The controllers only talk to the [Collaborators] they are given and render
//! into a [PageView] or [FormView], so they work the same against the SQLite
//! backed APIs and against test doubles.

mod collaborators;
mod create_transaction_form;
mod format;
mod handlers;
mod transactions_page;
mod workspace;

#[cfg(test)]
mod test_fakes;

pub use collaborators::{
    App, ClientEvents, Collaborators, Confirm, ConfirmedByClient, MODAL_CLOSE_EVENT, Modal,
    UPDATE_EVENT, UPDATE_WIDGETS_EVENT,
};
pub use create_transaction_form::{
    ACCOUNTS_SELECT_CLASS, CreateTransactionForm, FormElement, FormValues, FormView,
};
pub use format::{format_date, format_timestamp};
pub(crate) use handlers::{
    click_transactions_page, get_create_transaction_form, get_transactions_page_fragment,
    get_transactions_view, submit_create_transaction_form,
};
pub use transactions_page::{
    ClickTarget, Fetched, PageAction, PageElement, PageView, REMOVE_ACCOUNT_CLASS,
    REMOVE_TRANSACTION_CLASS, RenderJob, TITLE_PLACEHOLDER, TransactionsPage, transaction_html,
};
pub use workspace::Workspace;
