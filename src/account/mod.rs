//! Accounts: the data model, SQLite queries, the data-access capability,
//! the JSON API and the accounts widget.

mod api;
mod core;
mod endpoints;
mod widget;

pub use api::{AccountApi, SqliteAccountApi};
pub use core::{Account, AccountFilter, create_account, create_account_table};
pub use endpoints::{
    create_account_endpoint, delete_account_endpoint, get_account_endpoint,
    list_accounts_endpoint,
};
pub use widget::{accounts_widget_loader, create_account_from_widget, get_accounts_widget};
