//! Defines the transaction model, the store interface and its SQLite implementation.

use std::{
    ops::RangeInclusive,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::Serialize;
use time::Date;

use crate::{
    AppState, CategoryName, Error, Money, auth::UserID, database_id::TransactionId,
    db::lock_connection,
};

// ============================================================================
// MODELS
// ============================================================================

/// A single spending event owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user who recorded the transaction.
    #[serde(skip)]
    pub owner_id: UserID,
    /// What the money was spent on.
    pub description: String,
    /// How much was spent, never negative.
    pub amount: Money,
    /// The spending category, e.g. "Food".
    pub category: CategoryName,
    /// When the money was spent.
    pub date: Date,
}

/// The details needed to record a new transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// What the money was spent on, trimmed before storing.
    pub description: String,
    /// How much was spent.
    pub amount: Money,
    /// The spending category.
    pub category: CategoryName,
    /// When the money was spent.
    pub date: Date,
}

// ============================================================================
// STORE
// ============================================================================

/// Handles the creation and retrieval of transactions.
///
/// Every operation is scoped to the user given as `owner`.
pub trait TransactionStore {
    /// Record a new transaction for `owner`.
    ///
    /// # Errors
    /// Returns an [Error::NegativeAmount] if the amount is below zero, an
    /// [Error::InvalidAmount] if it is above [Money::MAX] or an
    /// [Error::EmptyDescription] if the description is blank.
    fn create(&self, owner: UserID, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Get one of `owner`'s transactions.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not exist or an
    /// [Error::Forbidden] if it belongs to another user.
    fn get(&self, owner: UserID, id: TransactionId) -> Result<Transaction, Error>;

    /// All of `owner`'s transactions, newest first.
    fn list(&self, owner: UserID) -> Result<Vec<Transaction>, Error>;

    /// `owner`'s transactions dated within `date_range`, newest first.
    fn list_in_range(
        &self,
        owner: UserID,
        date_range: RangeInclusive<Date>,
    ) -> Result<Vec<Transaction>, Error>;

    /// Delete one of `owner`'s transactions, returning the removed record.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not exist or an
    /// [Error::Forbidden] if it belongs to another user. Nothing is deleted
    /// when an error is returned.
    fn delete(&self, owner: UserID, id: TransactionId) -> Result<Transaction, Error>;
}

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a store that shares `connection`.
    ///
    /// The transaction table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl FromRef<AppState> for SQLiteTransactionStore {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.db_connection.clone())
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn create(&self, owner: UserID, transaction: NewTransaction) -> Result<Transaction, Error> {
        if transaction.amount.is_negative() {
            return Err(Error::NegativeAmount(transaction.amount));
        }

        if transaction.amount.exceeds_max() {
            return Err(Error::InvalidAmount(transaction.amount.to_string()));
        }

        let description = transaction.description.trim().to_owned();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        let connection = lock_connection(&self.connection)?;
        let transaction = create_transaction(
            owner,
            NewTransaction {
                description,
                ..transaction
            },
            &connection,
        )?;
        tracing::debug!("Created transaction {} for user {owner}", transaction.id);

        Ok(transaction)
    }

    fn get(&self, owner: UserID, id: TransactionId) -> Result<Transaction, Error> {
        let connection = lock_connection(&self.connection)?;
        let transaction = get_transaction(id, &connection)?;

        check_owner(owner, transaction)
    }

    fn list(&self, owner: UserID) -> Result<Vec<Transaction>, Error> {
        let connection = lock_connection(&self.connection)?;

        connection
            .prepare(
                "SELECT id, user_id, description, amount, category, date FROM \"transaction\"
                 WHERE user_id = :user_id
                 ORDER BY date DESC, id DESC",
            )?
            .query_map(&[(":user_id", &owner.as_i64())], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn list_in_range(
        &self,
        owner: UserID,
        date_range: RangeInclusive<Date>,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = lock_connection(&self.connection)?;

        connection
            .prepare(
                "SELECT id, user_id, description, amount, category, date FROM \"transaction\"
                 WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
                 ORDER BY date DESC, id DESC",
            )?
            .query_map(
                (owner.as_i64(), date_range.start(), date_range.end()),
                map_transaction_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn delete(&self, owner: UserID, id: TransactionId) -> Result<Transaction, Error> {
        let connection = lock_connection(&self.connection)?;
        let transaction = check_owner(owner, get_transaction(id, &connection)?)?;

        connection.execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )?;
        tracing::debug!("Deleted transaction {id} for user {owner}");

        Ok(transaction)
    }
}

fn check_owner(owner: UserID, transaction: Transaction) -> Result<Transaction, Error> {
    if transaction.owner_id == owner {
        Ok(transaction)
    } else {
        tracing::warn!(
            "User {owner} tried to access transaction {} owned by user {}",
            transaction.id,
            transaction.owner_id
        );
        Err(Error::Forbidden)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a transaction for `owner` without validating it.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is some SQL error,
/// including amounts that violate the table's non-negative check.
pub fn create_transaction(
    owner: UserID,
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, description, amount, category, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_id, description, amount, category, date",
        )?
        .query_row(
            (
                owner.as_i64(),
                transaction.description,
                transaction.amount,
                transaction.category,
                transaction.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`, regardless of owner.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, description, amount, category, date FROM \"transaction\"
             WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                amount INTEGER NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        owner_id: UserID::new(row.get(1)?),
        description: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        date: row.get(5)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
