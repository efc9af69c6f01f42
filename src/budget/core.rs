//! Defines the budget goal store interface and its SQLite implementation.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    AppState, CategoryName, Error, Money, aggregation::Goals, auth::UserID, db::lock_connection,
};

/// Handles the storage of per-category budget goals.
///
/// Only goals are stored, the amount spent is always derived from transactions.
pub trait BudgetStore {
    /// The goal for each of `owner`'s budgeted categories.
    fn list(&self, owner: UserID) -> Result<Goals, Error>;

    /// Set `owner`'s goal for `category`, replacing any existing goal.
    ///
    /// # Errors
    /// Returns an [Error::NegativeGoal] if `goal` is below zero or an
    /// [Error::InvalidAmount] if it is above [Money::MAX].
    fn set_goal(&self, owner: UserID, category: CategoryName, goal: Money) -> Result<(), Error>;
}

/// Stores budget goals in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteBudgetStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteBudgetStore {
    /// Create a store that shares `connection`.
    ///
    /// The budget table must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl FromRef<AppState> for SQLiteBudgetStore {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.db_connection.clone())
    }
}

impl BudgetStore for SQLiteBudgetStore {
    fn list(&self, owner: UserID) -> Result<Goals, Error> {
        let connection = lock_connection(&self.connection)?;

        connection
            .prepare("SELECT category, goal FROM budget WHERE user_id = :user_id")?
            .query_map(&[(":user_id", &owner.as_i64())], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .map(|maybe_goal| maybe_goal.map_err(Error::from))
            .collect()
    }

    fn set_goal(&self, owner: UserID, category: CategoryName, goal: Money) -> Result<(), Error> {
        if goal.is_negative() {
            return Err(Error::NegativeGoal(goal));
        }

        if goal.exceeds_max() {
            return Err(Error::InvalidAmount(goal.to_string()));
        }

        let connection = lock_connection(&self.connection)?;
        connection.execute(
            "INSERT INTO budget (user_id, category, goal) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, category) DO UPDATE SET goal = excluded.goal",
            (owner.as_i64(), &category, goal),
        )?;
        tracing::debug!("Set {category} budget goal to {goal} for user {owner}");

        Ok(())
    }
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                goal INTEGER NOT NULL DEFAULT 0 CHECK (goal >= 0),
                PRIMARY KEY(user_id, category),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}
