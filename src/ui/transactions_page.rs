//! The page that lists the transactions of one account and removes transactions and accounts.

use std::sync::Arc;

use maud::{Markup, PreEscaped, html};
use serde::Deserialize;

use crate::{
    Error,
    account::{Account, AccountApi},
    database_id::{AccountId, TransactionId},
    endpoints,
    html::{BUTTON_DELETE_STYLE, CURRENCY_SIGN, format_sum},
    transaction::{Transaction, TransactionApi, TransactionQuery},
    ui::{collaborators::Collaborators, format::format_timestamp},
};

/// The title shown when no account is loaded.
pub const TITLE_PLACEHOLDER: &str = "Название счета";
/// Marks the element that removes the loaded account.
pub const REMOVE_ACCOUNT_CLASS: &str = "remove-account";
/// Marks the buttons that remove a transaction. The button's `data-id` holds the transaction ID.
pub const REMOVE_TRANSACTION_CLASS: &str = "transaction__remove";

const CONFIRM_REMOVE_ACCOUNT: &str = "Вы действительно хотите удалить счёт?";
const CONFIRM_REMOVE_TRANSACTION: &str = "Вы действительно хотите удалить эту транзакцию?";

/// Where the page renders to.
pub trait PageView: Send {
    /// Replace the text of the title element.
    fn set_title(&mut self, title: &str);

    /// Replace the markup of the content element.
    fn set_content(&mut self, content: Markup);
}

/// A [PageView] that keeps the rendered title and content for serving as HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct PageElement {
    title: String,
    content: String,
}

impl PageElement {
    /// An element with the placeholder title and no content.
    pub fn new() -> Self {
        Self {
            title: TITLE_PLACEHOLDER.to_owned(),
            content: String::new(),
        }
    }

    /// The text of the title element.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The markup of the content element.
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Default for PageElement {
    fn default() -> Self {
        Self::new()
    }
}

impl PageView for PageElement {
    fn set_title(&mut self, title: &str) {
        title.clone_into(&mut self.title);
    }

    fn set_content(&mut self, content: Markup) {
        self.content = content.into_string();
    }
}

/// What was clicked inside the page, as reported by the browser.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClickTarget {
    /// The class list of the clicked element.
    #[serde(default)]
    pub class: String,
    /// The class list of the closest button, if any.
    pub button_class: Option<String>,
    /// The `data-id` of the closest button, if any.
    pub button_id: Option<String>,
    /// The account the page showed when it was clicked, if the page says.
    pub account_id: Option<AccountId>,
}

/// The action a click on the page asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Remove the loaded account. Holds the account the clicked page showed, if known.
    RemoveAccount(Option<AccountId>),
    /// Remove the transaction with this ID.
    RemoveTransaction(TransactionId),
}

impl ClickTarget {
    /// Work out which action the click asks for.
    ///
    /// The account marker wins when both markers are present, so a click
    /// leads to at most one action.
    pub fn action(&self) -> Option<PageAction> {
        if has_class(&self.class, REMOVE_ACCOUNT_CLASS) {
            return Some(PageAction::RemoveAccount(self.account_id));
        }

        let button_class = self.button_class.as_deref()?;

        if !has_class(button_class, REMOVE_TRANSACTION_CLASS) {
            return None;
        }

        let id = self.button_id.as_deref()?;

        match id.trim().parse() {
            Ok(id) => Some(PageAction::RemoveTransaction(id)),
            Err(error) => {
                tracing::warn!("Ignoring click on a remove button with the ID {id:?}: {error}");
                None
            }
        }
    }
}

fn has_class(class_list: &str, class: &str) -> bool {
    class_list.split_whitespace().any(|name| name == class)
}

/// The data fetched for one render, tagged with the render it belongs to.
#[derive(Debug)]
pub struct Fetched {
    generation: u64,
    options: TransactionQuery,
    title: Result<Account, Error>,
    transactions: Result<Vec<Transaction>, Error>,
}

/// The requests for one render, detached from the page so they can run
/// without holding on to it.
pub struct RenderJob {
    generation: u64,
    options: TransactionQuery,
    accounts: Arc<dyn AccountApi>,
    transactions: Arc<dyn TransactionApi>,
}

impl RenderJob {
    /// The query being rendered.
    pub fn options(&self) -> TransactionQuery {
        self.options
    }

    /// Request the account and its transactions.
    ///
    /// The two requests are independent: a failure in one does not stop the other.
    pub fn run(self) -> Fetched {
        let title = self.accounts.get(self.options.account_id);
        let transactions = self.transactions.list(&self.options);

        Fetched {
            generation: self.generation,
            options: self.options,
            title,
            transactions,
        }
    }
}

/// The controller for the transactions page of one account.
pub struct TransactionsPage<V> {
    element: V,
    collaborators: Collaborators,
    last_options: Option<TransactionQuery>,
    generation: u64,
}

impl<V: PageView> TransactionsPage<V> {
    /// Bind the page to `element`.
    ///
    /// # Errors
    /// Returns [Error::MissingElement] if `element` is `None`.
    pub fn new(element: Option<V>, collaborators: Collaborators) -> Result<Self, Error> {
        let element = element.ok_or(Error::MissingElement("TransactionsPage"))?;

        Ok(Self {
            element,
            collaborators,
            last_options: None,
            generation: 0,
        })
    }

    /// The element the page renders to.
    pub fn element(&self) -> &V {
        &self.element
    }

    /// The most recently requested query, `None` if the page is cleared or was never rendered.
    pub fn last_options(&self) -> Option<TransactionQuery> {
        self.last_options
    }

    /// Dispatch a click inside the page to the action it asks for.
    pub fn handle_click(&mut self, target: &ClickTarget) -> Result<(), Error> {
        match target.action() {
            Some(PageAction::RemoveAccount(shown)) => self.remove_shown_account(shown),
            Some(PageAction::RemoveTransaction(id)) => self.remove_transaction(id),
            None => Ok(()),
        }
    }

    /// Ask the user to confirm and remove the loaded account.
    ///
    /// Does nothing, without asking, when no account is loaded. The page is
    /// cleared once the account has been removed.
    pub fn remove_account(&mut self) -> Result<(), Error> {
        let Some(options) = self.last_options else {
            return Ok(());
        };

        if !self.collaborators.confirm.confirm(CONFIRM_REMOVE_ACCOUNT) {
            return Ok(());
        }

        self.collaborators.accounts.remove(options.account_id)?;
        tracing::info!("Removed account {}", options.account_id);

        self.clear();
        self.collaborators.app.update_widgets();

        Ok(())
    }

    /// Remove the loaded account, provided it is the account `shown` on the clicked page.
    ///
    /// # Errors
    /// Returns [Error::AccountNotShown], without asking or removing anything,
    /// if the page has since moved on to another account or was cleared.
    fn remove_shown_account(&mut self, shown: Option<AccountId>) -> Result<(), Error> {
        let loaded = self.last_options.map(|options| options.account_id);

        match shown {
            Some(shown) if loaded != Some(shown) => {
                tracing::warn!(
                    "Not removing account {shown}, the page now shows {}",
                    loaded.map_or_else(|| "no account".to_owned(), |id| format!("account {id}"))
                );
                Err(Error::AccountNotShown(shown))
            }
            _ => self.remove_account(),
        }
    }

    /// Ask the user to confirm and remove the transaction `id`.
    ///
    /// The page is not changed here, it is refreshed through [App::update](crate::ui::App::update).
    pub fn remove_transaction(&self, id: TransactionId) -> Result<(), Error> {
        if !self.collaborators.confirm.confirm(CONFIRM_REMOVE_TRANSACTION) {
            return Ok(());
        }

        self.collaborators.transactions.remove(id)?;
        tracing::info!("Removed transaction {id}");

        self.collaborators.app.update();

        Ok(())
    }

    /// Render the account in `options` and its transactions. Does nothing for `None`.
    ///
    /// The title and the list are rendered independently, the first error is returned.
    pub fn render(&mut self, options: Option<TransactionQuery>) -> Result<(), Error> {
        match self.begin_render(options) {
            Some(job) => {
                let fetched = job.run();
                self.apply(fetched)
            }
            None => Ok(()),
        }
    }

    /// Render the last requested query again, if there is one.
    pub fn update(&mut self) -> Result<(), Error> {
        self.render(self.last_options)
    }

    /// Start a render of `options`, superseding any render in flight.
    ///
    /// `options` is remembered straight away. Run the returned job, then pass
    /// its result to [TransactionsPage::apply].
    pub fn begin_render(&mut self, options: Option<TransactionQuery>) -> Option<RenderJob> {
        let options = options?;

        self.last_options = Some(options);
        self.generation += 1;

        Some(RenderJob {
            generation: self.generation,
            options,
            accounts: self.collaborators.accounts.clone(),
            transactions: self.collaborators.transactions.clone(),
        })
    }

    /// Start a render of the last requested query, see [TransactionsPage::begin_render].
    pub fn begin_update(&mut self) -> Option<RenderJob> {
        self.begin_render(self.last_options)
    }

    /// Render fetched data, unless a newer render or a clear has happened since it was requested.
    ///
    /// An account that does not exist is forgotten: the page is cleared and
    /// [Error::NotFound] returned.
    pub fn apply(&mut self, fetched: Fetched) -> Result<(), Error> {
        if fetched.generation != self.generation {
            tracing::debug!(
                "Dropping render {} of account {}, the current render is {}",
                fetched.generation,
                fetched.options.account_id,
                self.generation
            );
            return Ok(());
        }

        if matches!(fetched.title, Err(Error::NotFound)) {
            tracing::warn!("Account {} does not exist", fetched.options.account_id);
            self.clear();
            return Err(Error::NotFound);
        }

        let title = fetched
            .title
            .map(|account| self.render_title(&account.name));
        let transactions = fetched
            .transactions
            .map(|transactions| self.render_transactions(&transactions));

        title.and(transactions)
    }

    /// Empty the list, show the placeholder title and forget the last query.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.render_transactions(&[]);
        self.render_title(TITLE_PLACEHOLDER);
        self.last_options = None;
    }

    /// Write `name` as the page title.
    pub fn render_title(&mut self, name: &str) {
        self.element.set_title(name);
    }

    /// Replace the content with the markup for `data`.
    pub fn render_transactions(&mut self, data: &[Transaction]) {
        let content = html! {
            @for transaction in data {
                (transaction_html(transaction))
            }
        };

        self.element.set_content(content);
    }
}

impl TransactionsPage<PageElement> {
    /// The page as an htmx fragment.
    ///
    /// The fragment reloads itself when the app is updated. The remove account
    /// button only asks for confirmation when an account is loaded.
    pub fn markup(&self) -> Markup {
        html! {
            section
                id="transactions-page"
                class="transactions-page"
                hx-get=(endpoints::TRANSACTIONS_PAGE_FRAGMENT)
                hx-trigger="app:update from:body"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
            {
                div class="page-header clearfix"
                {
                    h2 class="content-title pull-left" { (self.element.title()) }

                    @if let Some(options) = self.last_options {
                        button
                            type="button"
                            class={ (BUTTON_DELETE_STYLE) " pull-right " (REMOVE_ACCOUNT_CLASS) }
                            hx-post=(endpoints::TRANSACTIONS_PAGE_CLICK)
                            hx-vals=(remove_account_vals(options.account_id))
                            hx-confirm=(CONFIRM_REMOVE_ACCOUNT)
                            hx-target="#transactions-page"
                            hx-swap="outerHTML"
                        {
                            span class="fa fa-trash" {}
                            " Удалить счёт"
                        }
                    } @else {
                        button
                            type="button"
                            class={ (BUTTON_DELETE_STYLE) " pull-right " (REMOVE_ACCOUNT_CLASS) }
                            disabled
                        {
                            span class="fa fa-trash" {}
                            " Удалить счёт"
                        }
                    }
                }

                div class="content" { (PreEscaped(self.element.content())) }
            }
        }
    }
}

fn remove_account_vals(account_id: AccountId) -> String {
    serde_json::json!({ "class": REMOVE_ACCOUNT_CLASS, "account_id": account_id }).to_string()
}

/// The markup for one transaction in the list.
pub fn transaction_html(item: &Transaction) -> Markup {
    let button_class = format!("{BUTTON_DELETE_STYLE} {REMOVE_TRANSACTION_CLASS}");
    let click_vals = serde_json::json!({
        "class": button_class,
        "button_class": button_class,
        "button_id": item.id.to_string(),
    })
    .to_string();

    html! {
        div class={ "transaction transaction_" (item.type_) " row" }
        {
            div class="col-md-7"
            {
                div class="transaction__icon"
                {
                    span class="fa fa-money fa-2x" {}
                }

                div class="transaction__info"
                {
                    h4 class="transaction__title" { (item.name) }
                    div class="transaction__date" { (format_timestamp(item.created_at)) }
                }
            }

            div class="col-md-3"
            {
                div class="transaction__summ"
                {
                    (format_sum(item.sum))
                    " "
                    span class="currency" { (CURRENCY_SIGN) }
                }
            }

            div class="col-md-2 transaction__controls"
            {
                button
                    type="button"
                    class=(button_class)
                    data-id=(item.id)
                    hx-post=(endpoints::TRANSACTIONS_PAGE_CLICK)
                    hx-vals=(click_vals)
                    hx-confirm=(CONFIRM_REMOVE_TRANSACTION)
                    hx-target="#transactions-page"
                    hx-swap="outerHTML"
                {
                    span class="fa fa-trash" {}
                }
            }
        }
    }
}
