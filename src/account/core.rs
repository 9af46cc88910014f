use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::AccountId};

/// A named account that transactions are recorded against, e.g. a bank
/// account, a wallet or a credit card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
}

/// Narrows down the accounts returned by [list_accounts].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccountFilter {
    /// Only return the account with exactly this name.
    pub name: Option<String>,
}

/// An account together with its balance, used by the accounts widget.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub name: String,
    /// Total income minus total expenses.
    pub balance: f64,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;

    Ok(Account { id, name })
}

/// Create a new account called `name`.
///
/// Leading and trailing whitespace is removed from `name`.
///
/// # Errors
/// Returns a:
/// - [Error::EmptyName] if `name` is empty or only whitespace,
/// - [Error::DuplicateAccountName] if an account with the same name exists,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_account(name: &str, connection: &Connection) -> Result<Account, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    connection
        .execute("INSERT INTO account (name) VALUES (?1)", params![name])
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(error, Some(_))
                if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Error::DuplicateAccountName(name.to_owned())
            }
            error => error.into(),
        })?;

    Ok(Account {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
    })
}

/// Get all accounts in the order they were created, optionally narrowed down by `filter`.
pub fn list_accounts(
    filter: Option<&AccountFilter>,
    connection: &Connection,
) -> Result<Vec<Account>, Error> {
    let name = filter.and_then(|filter| filter.name.as_deref());

    connection
        .prepare(
            "SELECT id, name FROM account
             WHERE (?1 IS NULL OR name = ?1)
             ORDER BY id ASC",
        )?
        .query_map(params![name], map_row_to_account)?
        .map(|account| account.map_err(Error::from))
        .collect()
}

/// Get the account with the given `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such account.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_one(
            "SELECT id, name FROM account WHERE id = :id",
            &[(":id", &id)],
            map_row_to_account,
        )
        .map_err(Error::from)
}

type RowsAffected = usize;

/// Delete the account with the given `id` along with its transactions.
pub fn delete_account(id: AccountId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM account WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

/// Get every account with its balance, ordered by name.
pub fn get_account_summaries(connection: &Connection) -> Result<Vec<AccountSummary>, Error> {
    connection
        .prepare(
            "SELECT account.id, account.name,
                COALESCE(SUM(CASE \"transaction\".type
                    WHEN 'income' THEN \"transaction\".sum
                    ELSE -\"transaction\".sum END), 0)
             FROM account
             LEFT JOIN \"transaction\" ON \"transaction\".account_id = account.id
             GROUP BY account.id
             ORDER BY account.name ASC",
        )?
        .query_map([], |row| {
            Ok(AccountSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                balance: row.get(2)?,
            })
        })?
        .map(|summary| summary.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_account_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_account_table(&connection));
    }
}

#[cfg(test)]
mod query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        account::{Account, AccountFilter},
        db::initialize,
        transaction::{NewTransaction, TransactionType, create_transaction},
    };

    use super::{
        AccountSummary, create_account, delete_account, get_account, get_account_summaries,
        list_accounts,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_trims_name() {
        let conn = get_test_connection();

        let account = create_account("  Wallet ", &conn).unwrap();

        assert_eq!(
            account,
            Account {
                id: 1,
                name: "Wallet".to_owned()
            }
        );
    }

    #[test]
    fn create_fails_on_empty_name() {
        let conn = get_test_connection();

        assert_eq!(create_account("   ", &conn), Err(Error::EmptyName));
    }

    #[test]
    fn create_fails_on_duplicate_name() {
        let conn = get_test_connection();
        create_account("Wallet", &conn).unwrap();

        assert_eq!(
            create_account("Wallet", &conn),
            Err(Error::DuplicateAccountName("Wallet".to_owned()))
        );
    }

    #[test]
    fn list_returns_accounts_in_creation_order() {
        let conn = get_test_connection();
        let card = create_account("Card", &conn).unwrap();
        let cash = create_account("Cash", &conn).unwrap();

        let accounts = list_accounts(None, &conn).unwrap();

        assert_eq!(accounts, vec![card, cash]);
    }

    #[test]
    fn list_applies_name_filter() {
        let conn = get_test_connection();
        create_account("Card", &conn).unwrap();
        let cash = create_account("Cash", &conn).unwrap();
        let filter = AccountFilter {
            name: Some("Cash".to_owned()),
        };

        let accounts = list_accounts(Some(&filter), &conn).unwrap();

        assert_eq!(accounts, vec![cash]);
    }

    #[test]
    fn get_missing_account_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_account(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_account_and_its_transactions() {
        let conn = get_test_connection();
        let account = create_account("Card", &conn).unwrap();
        create_transaction(
            &NewTransaction {
                type_: TransactionType::Expense,
                name: "Coffee".to_owned(),
                sum: 4.5,
                account_id: account.id,
            },
            time::macros::datetime!(2025-01-02 08:30:00),
            &conn,
        )
        .unwrap();

        let rows_affected = delete_account(account.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_account(account.id, &conn), Err(Error::NotFound));
        let remaining: i64 = conn
            .query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn summaries_subtract_expenses_from_income() {
        let conn = get_test_connection();
        let card = create_account("Card", &conn).unwrap();
        let cash = create_account("Cash", &conn).unwrap();
        let created_at = time::macros::datetime!(2025-01-02 08:30:00);
        for (type_, sum) in [
            (TransactionType::Income, 100.0),
            (TransactionType::Expense, 30.5),
        ] {
            create_transaction(
                &NewTransaction {
                    type_,
                    name: "test".to_owned(),
                    sum,
                    account_id: card.id,
                },
                created_at,
                &conn,
            )
            .unwrap();
        }

        let summaries = get_account_summaries(&conn).unwrap();

        assert_eq!(
            summaries,
            vec![
                AccountSummary {
                    id: card.id,
                    name: card.name,
                    balance: 69.5,
                },
                AccountSummary {
                    id: cash.id,
                    name: cash.name,
                    balance: 0.0,
                },
            ]
        );
    }
}
