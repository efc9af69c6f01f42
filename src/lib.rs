//! Money Mentor is a personal finance tracker.
//!
//! Users record what they spend, set a goal for each spending category and
//! track their investments. Spending totals, budget utilisation and chart
//! data are derived from the stored transactions every time they are read.
//!
//! This library provides a JSON REST API backed by SQLite. The derivation
//! logic lives in [aggregation] and has no I/O of its own.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

pub mod aggregation;
mod app_state;
mod auth;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod date_range;
mod db;
mod endpoints;
mod error;
mod investment;
mod logging;
mod money;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use auth::{PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_id};
pub use budget::{BudgetSnapshot, BudgetStore, SQLiteBudgetStore, load_budget_summary};
pub use category::CategoryName;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use investment::{Investment, InvestmentStore, NewInvestment, SQLiteInvestmentStore};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::Money;
pub use routing::build_router;
pub use transaction::{NewTransaction, SQLiteTransactionStore, Transaction, TransactionStore};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
