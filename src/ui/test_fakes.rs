//! In-memory collaborators for exercising the controllers without a database.

use std::sync::{Arc, Mutex};

use time::macros::datetime;

use crate::{
    Error,
    account::{Account, AccountApi, AccountFilter},
    database_id::{AccountId, TransactionId},
    transaction::{NewTransaction, Transaction, TransactionApi, TransactionQuery},
    ui::{ClientEvents, Collaborators, Confirm},
};

#[derive(Default)]
pub(crate) struct FakeAccountApi {
    pub accounts: Vec<Account>,
    pub fail: bool,
    pub removed: Mutex<Vec<AccountId>>,
}

impl AccountApi for FakeAccountApi {
    fn list(&self, _filter: Option<&AccountFilter>) -> Result<Vec<Account>, Error> {
        if self.fail {
            return Err(Error::DatabaseLockError);
        }

        Ok(self.accounts.clone())
    }

    fn get(&self, id: AccountId) -> Result<Account, Error> {
        if self.fail {
            return Err(Error::DatabaseLockError);
        }

        self.accounts
            .iter()
            .find(|account| account.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn remove(&self, id: AccountId) -> Result<(), Error> {
        if self.fail {
            return Err(Error::DeleteMissingAccount);
        }

        self.removed.lock().unwrap().push(id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeTransactionApi {
    pub transactions: Vec<Transaction>,
    pub fail: bool,
    pub created: Mutex<Vec<NewTransaction>>,
    pub removed: Mutex<Vec<TransactionId>>,
}

impl TransactionApi for FakeTransactionApi {
    fn list(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        if self.fail {
            return Err(Error::DatabaseLockError);
        }

        Ok(self
            .transactions
            .iter()
            .filter(|transaction| transaction.account_id == query.account_id)
            .cloned()
            .collect())
    }

    fn create(&self, new_transaction: &NewTransaction) -> Result<Transaction, Error> {
        if self.fail {
            return Err(Error::InvalidAccount(new_transaction.account_id));
        }

        let mut created = self.created.lock().unwrap();
        created.push(new_transaction.clone());

        Ok(Transaction {
            id: created.len() as TransactionId,
            type_: new_transaction.type_,
            name: new_transaction.name.clone(),
            sum: new_transaction.sum,
            created_at: datetime!(2019-03-10 03:20:41),
            account_id: new_transaction.account_id,
        })
    }

    fn remove(&self, id: TransactionId) -> Result<(), Error> {
        if self.fail {
            return Err(Error::DeleteMissingTransaction);
        }

        self.removed.lock().unwrap().push(id);
        Ok(())
    }
}

/// Answers every prompt with the same answer and remembers what was asked.
pub(crate) struct FakeConfirm {
    pub answer: bool,
    pub asked: Mutex<Vec<String>>,
}

impl FakeConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }
}

impl Confirm for FakeConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.asked.lock().unwrap().push(message.to_owned());
        self.answer
    }
}

pub(crate) struct Fakes {
    pub accounts: Arc<FakeAccountApi>,
    pub transactions: Arc<FakeTransactionApi>,
    pub events: Arc<ClientEvents>,
    pub confirm: Arc<FakeConfirm>,
}

impl Fakes {
    pub fn new(accounts: FakeAccountApi, transactions: FakeTransactionApi, answer: bool) -> Self {
        Self {
            accounts: Arc::new(accounts),
            transactions: Arc::new(transactions),
            events: Arc::new(ClientEvents::new()),
            confirm: Arc::new(FakeConfirm::new(answer)),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            accounts: self.accounts.clone(),
            transactions: self.transactions.clone(),
            app: self.events.clone(),
            modal: self.events.clone(),
            confirm: self.confirm.clone(),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.confirm.asked.lock().unwrap().clone()
    }
}

pub(crate) fn account(id: AccountId, name: &str) -> Account {
    Account {
        id,
        name: name.to_owned(),
    }
}
