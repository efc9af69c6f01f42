//! Defines the investment model, the store interface and its SQLite implementation.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{
    AppState, Error, Money, auth::UserID, database_id::InvestmentId, db::lock_connection,
};

/// A holding tracked by a user, e.g. a brokerage account or a term deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Investment {
    /// The ID of the investment.
    pub id: InvestmentId,
    /// The user who recorded the investment.
    #[serde(skip)]
    pub owner_id: UserID,
    /// A label for the holding, e.g. "Index fund".
    pub name: String,
    /// The current value, never negative.
    pub value: Money,
}

/// The details needed to record a new investment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvestment {
    /// A label for the holding, trimmed before storing.
    pub name: String,
    /// The current value.
    pub value: Money,
}

/// Handles the creation, retrieval and deletion of investments.
pub trait InvestmentStore {
    /// All of `owner`'s investments, most recently added first.
    fn list(&self, owner: UserID) -> Result<Vec<Investment>, Error>;

    /// Record a new investment for `owner`.
    ///
    /// # Errors
    /// Returns an [Error::NegativeInvestmentValue] if the value is below zero, an
    /// [Error::InvalidAmount] if it is above [Money::MAX] or an
    /// [Error::EmptyInvestmentName] if the name is blank.
    fn create(&self, owner: UserID, investment: NewInvestment) -> Result<Investment, Error>;

    /// Delete one of `owner`'s investments, returning the removed record.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not exist or an
    /// [Error::Forbidden] if it belongs to another user.
    fn delete(&self, owner: UserID, id: InvestmentId) -> Result<Investment, Error>;
}

/// Stores investments in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteInvestmentStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteInvestmentStore {
    /// Create a store that shares `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl FromRef<AppState> for SQLiteInvestmentStore {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.db_connection.clone())
    }
}

impl InvestmentStore for SQLiteInvestmentStore {
    fn list(&self, owner: UserID) -> Result<Vec<Investment>, Error> {
        let connection = lock_connection(&self.connection)?;

        connection
            .prepare(
                "SELECT id, user_id, name, value FROM investment
                 WHERE user_id = :user_id
                 ORDER BY id DESC",
            )?
            .query_map(&[(":user_id", &owner.as_i64())], map_investment_row)?
            .map(|maybe_investment| maybe_investment.map_err(Error::from))
            .collect()
    }

    fn create(&self, owner: UserID, investment: NewInvestment) -> Result<Investment, Error> {
        if investment.value.is_negative() {
            return Err(Error::NegativeInvestmentValue(investment.value));
        }

        if investment.value.exceeds_max() {
            return Err(Error::InvalidAmount(investment.value.to_string()));
        }

        let name = investment.name.trim();
        if name.is_empty() {
            return Err(Error::EmptyInvestmentName);
        }

        let connection = lock_connection(&self.connection)?;
        let investment = connection
            .prepare(
                "INSERT INTO investment (user_id, name, value) VALUES (?1, ?2, ?3)
                 RETURNING id, user_id, name, value",
            )?
            .query_row((owner.as_i64(), name, investment.value), map_investment_row)?;
        tracing::debug!("Created investment {} for user {owner}", investment.id);

        Ok(investment)
    }

    fn delete(&self, owner: UserID, id: InvestmentId) -> Result<Investment, Error> {
        let connection = lock_connection(&self.connection)?;
        let investment = connection
            .prepare("SELECT id, user_id, name, value FROM investment WHERE id = :id")?
            .query_one(&[(":id", &id)], map_investment_row)?;

        if investment.owner_id != owner {
            tracing::warn!(
                "User {owner} tried to delete investment {id} owned by user {}",
                investment.owner_id
            );
            return Err(Error::Forbidden);
        }

        connection.execute("DELETE FROM investment WHERE id = :id", &[(":id", &id)])?;

        Ok(investment)
    }
}

/// Create the investment table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_investment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS investment (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                value INTEGER NOT NULL CHECK (value >= 0),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_investment_row(row: &Row) -> Result<Investment, rusqlite::Error> {
    Ok(Investment {
        id: row.get(0)?,
        owner_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        value: row.get(3)?,
    })
}
