//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    database_id::{AccountId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came into or went out of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received into the account.
    Income,
    /// Money spent from the account.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in the database, forms and CSS class names.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type \"{other}\"")),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// The format used to store and exchange transaction timestamps, e.g. "2019-03-10 03:20:41".
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

time::serde::format_description!(
    timestamp_format,
    PrimitiveDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second]"
);

/// An income or expense recorded against an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// A short description of what the transaction was for.
    pub name: String,
    /// The amount of money, always non-negative.
    pub sum: f64,
    /// When the transaction was recorded, in the server's local time.
    #[serde(with = "timestamp_format")]
    pub created_at: PrimitiveDateTime,
    /// The account the transaction belongs to.
    pub account_id: AccountId,
}

/// The data submitted to create a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// What the transaction was for. Surrounding whitespace is trimmed on save.
    pub name: String,
    /// The amount of money, must be finite and non-negative.
    pub sum: f64,
    /// The account to record the transaction against.
    pub account_id: AccountId,
}

/// The options for listing transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    /// Only list the transactions of this account.
    pub account_id: AccountId,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                name TEXT NOT NULL,
                sum REAL NOT NULL,
                created_at TEXT NOT NULL,
                account_id INTEGER NOT NULL,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_created_at
            ON \"transaction\"(account_id, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let type_ = row.get(1)?;
    let name = row.get(2)?;
    let sum = row.get(3)?;
    let created_at: String = row.get(4)?;
    let created_at = PrimitiveDateTime::parse(&created_at, TIMESTAMP_FORMAT)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error)))?;
    let account_id = row.get(5)?;

    Ok(Transaction {
        id,
        type_,
        name,
        sum,
        created_at,
        account_id,
    })
}

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyName] if the name is empty or only whitespace,
/// - [Error::InvalidSum] if the sum is negative or not a finite number,
/// - [Error::InvalidAccount] if the account ID does not refer to an account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: &NewTransaction,
    created_at: PrimitiveDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let name = new_transaction.name.trim();

    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    if !new_transaction.sum.is_finite() || new_transaction.sum < 0.0 {
        return Err(Error::InvalidSum(new_transaction.sum));
    }

    let created_at = created_at
        .format(TIMESTAMP_FORMAT)
        .map_err(|error| Error::InvalidTimestamp(error.to_string()))?;

    connection
        .prepare(
            "INSERT INTO \"transaction\" (type, name, sum, created_at, account_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, type, name, sum, created_at, account_id",
        )?
        .query_row(
            (
                new_transaction.type_,
                name,
                new_transaction.sum,
                created_at,
                new_transaction.account_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidAccount(new_transaction.account_id),
            error => error.into(),
        })
}

/// Get the transactions matching `query`, newest first.
pub fn list_transactions(
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, type, name, sum, created_at, account_id FROM \"transaction\"
             WHERE account_id = :account_id
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":account_id", &query.account_id)], map_transaction_row)?
        .map(|transaction| transaction.map_err(Error::from))
        .collect()
}

type RowsAffected = usize;

/// Delete the transaction with the given `id`.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(Error::from)
}

// ============================================================================
// TESTS
// ============================================================================
