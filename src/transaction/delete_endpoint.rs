use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::{SQLiteTransactionStore, TransactionStore},
};

/// A route handler for deleting a transaction, responds with no content.
pub async fn delete_transaction_endpoint(
    State(store): State<SQLiteTransactionStore>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let removed = store.delete(user_id, transaction_id)?;
    tracing::info!(
        "Deleted transaction {} ({}, {})",
        removed.id,
        removed.category,
        removed.amount
    );

    Ok(StatusCode::NO_CONTENT)
}
