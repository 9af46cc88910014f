//! The modal form for creating a transaction.

use maud::{Markup, html};

use crate::{
    Error,
    account::Account,
    database_id::AccountId,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_GROUP_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
    transaction::{NewTransaction, Transaction, TransactionType},
    ui::collaborators::Collaborators,
};

/// Marks the select that lists the accounts.
pub const ACCOUNTS_SELECT_CLASS: &str = "accounts-select";

/// The base form abstraction: where the form renders to.
pub trait FormView: Send {
    /// Add an option to the accounts select.
    fn append_account_option(&mut self, account: &Account);

    /// Reset the form fields to their defaults.
    fn reset(&mut self);
}

/// The values typed into the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    /// Income or expense.
    pub type_: TransactionType,
    /// What the transaction was for.
    pub name: String,
    /// The amount, empty until the user types one.
    pub sum: Option<f64>,
    /// The selected account.
    pub account_id: Option<AccountId>,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            type_: TransactionType::Expense,
            name: String::new(),
            sum: None,
            account_id: None,
        }
    }
}

/// A [FormView] that keeps the form state for serving as HTML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormElement {
    options: Vec<Account>,
    values: FormValues,
}

impl FormElement {
    /// An empty form with no account options.
    pub fn new() -> Self {
        Self::default()
    }

    /// The options of the accounts select, in the order they were appended.
    pub fn options(&self) -> &[Account] {
        &self.options
    }

    /// The current field values.
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Put the submitted `data` into the fields.
    pub fn fill(&mut self, data: &NewTransaction) {
        self.values = FormValues {
            type_: data.type_,
            name: data.name.clone(),
            sum: Some(data.sum),
            account_id: Some(data.account_id),
        };
    }

    /// The form as an htmx fragment that submits to itself.
    pub fn markup(&self) -> Markup {
        let sum = self.values.sum.map(|sum| sum.to_string()).unwrap_or_default();

        html! {
            form
                id="create-transaction-form"
                class="create-transaction-form"
                hx-post=(endpoints::CREATE_TRANSACTION_FORM)
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
            {
                div class=(FORM_GROUP_STYLE)
                {
                    label for="transaction-type" { "Тип" }
                    select id="transaction-type" name="type" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for (type_, label) in [
                            (TransactionType::Expense, "Расход"),
                            (TransactionType::Income, "Доход"),
                        ] {
                            option value=(type_) selected[self.values.type_ == type_] { (label) }
                        }
                    }
                }

                div class=(FORM_GROUP_STYLE)
                {
                    label for="transaction-name" { "Название" }
                    input
                        id="transaction-name"
                        type="text"
                        name="name"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(self.values.name)
                        required;
                }

                div class=(FORM_GROUP_STYLE)
                {
                    label for="transaction-sum" { "Сумма" }
                    input
                        id="transaction-sum"
                        type="number"
                        name="sum"
                        min="0"
                        step="0.01"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(sum)
                        required;
                }

                div class=(FORM_GROUP_STYLE)
                {
                    label for="transaction-account" { "Счёт" }
                    select
                        id="transaction-account"
                        name="account_id"
                        class={ (FORM_TEXT_INPUT_STYLE) " " (ACCOUNTS_SELECT_CLASS) }
                        required
                    {
                        @for account in &self.options {
                            option
                                value=(account.id)
                                selected[self.values.account_id == Some(account.id)]
                            {
                                (account.name)
                            }
                        }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    (loading_spinner())
                    " Создать"
                }
            }
        }
    }
}

impl FormView for FormElement {
    fn append_account_option(&mut self, account: &Account) {
        self.options.push(account.clone());
    }

    fn reset(&mut self) {
        self.values = FormValues::default();
    }
}

/// The controller for the create transaction form.
pub struct CreateTransactionForm<V> {
    element: V,
    collaborators: Collaborators,
}

impl<V: FormView> CreateTransactionForm<V> {
    /// Bind the form to `element` and fill the accounts select.
    ///
    /// If the accounts cannot be listed the select is left as it is.
    pub fn new(element: V, collaborators: Collaborators) -> Self {
        let mut form = Self {
            element,
            collaborators,
        };

        if let Err(error) = form.render_accounts_list() {
            tracing::warn!("Could not list the accounts for the create transaction form: {error}");
        }

        form
    }

    /// The element the form renders to.
    pub fn element(&self) -> &V {
        &self.element
    }

    /// The element the form renders to.
    pub fn element_mut(&mut self) -> &mut V {
        &mut self.element
    }

    /// Append one option per account to the accounts select.
    ///
    /// # Errors
    /// Returns the error from listing the accounts, in which case nothing is appended.
    pub fn render_accounts_list(&mut self) -> Result<(), Error> {
        let accounts = self.collaborators.accounts.list(None)?;

        for account in &accounts {
            self.element.append_account_option(account);
        }

        Ok(())
    }

    /// Create a transaction from the submitted `data`.
    ///
    /// On success the form is reset, the modal closed and the app updated.
    /// On failure the form is left as it is and the error returned.
    pub fn on_submit(&mut self, data: &NewTransaction) -> Result<Transaction, Error> {
        let transaction = self.collaborators.transactions.create(data)?;
        tracing::info!(
            "Created transaction {} for account {}",
            transaction.id,
            transaction.account_id
        );

        self.element.reset();
        self.collaborators.modal.close();
        self.collaborators.app.update();

        Ok(transaction)
    }
}
