//! The page and form the web shell serves.

use crate::{
    Error,
    ui::{
        collaborators::Collaborators,
        create_transaction_form::{CreateTransactionForm, FormElement},
        transactions_page::{PageElement, TransactionsPage},
    },
};

/// The controllers bound to the in-memory elements served to the browser.
pub struct Workspace {
    /// The transactions page.
    pub page: TransactionsPage<PageElement>,
    /// The create transaction form shown in the modal.
    pub form: CreateTransactionForm<FormElement>,
    collaborators: Collaborators,
}

impl Workspace {
    /// Bind a page and a form.
    ///
    /// # Errors
    /// Returns an error if the page cannot be bound.
    pub fn new(collaborators: Collaborators) -> Result<Self, Error> {
        let page = TransactionsPage::new(Some(PageElement::new()), collaborators.clone())?;
        let form = CreateTransactionForm::new(FormElement::new(), collaborators.clone());

        Ok(Self {
            page,
            form,
            collaborators,
        })
    }

    /// Replace the form with a freshly bound one, e.g. when the modal is opened.
    pub fn bind_form(&mut self) {
        self.form = CreateTransactionForm::new(FormElement::new(), self.collaborators.clone());
    }
}
