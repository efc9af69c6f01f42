use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Money,
    auth::UserID,
    database_id::InvestmentId,
    investment::{Investment, InvestmentStore, NewInvestment, SQLiteInvestmentStore},
};

/// The user's investments and their combined value.
#[derive(Debug, Serialize)]
pub struct InvestmentsResponse {
    pub total: Money,
    pub investments: Vec<Investment>,
}

/// The request body for recording an investment.
#[derive(Debug, Deserialize)]
pub struct InvestmentForm {
    pub name: String,
    /// May be a JSON number or string.
    pub value: Decimal,
}

/// A route handler for listing the user's investments, most recently added first.
pub async fn list_investments_endpoint(
    State(store): State<SQLiteInvestmentStore>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<InvestmentsResponse>, Error> {
    let investments = store.list(user_id)?;
    let total = investments.iter().map(|investment| investment.value).sum();

    Ok(Json(InvestmentsResponse { total, investments }))
}

/// A route handler for recording an investment, responds with the stored investment.
pub async fn create_investment_endpoint(
    State(store): State<SQLiteInvestmentStore>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<InvestmentForm>,
) -> Result<(StatusCode, Json<Investment>), Error> {
    let investment = store.create(
        user_id,
        NewInvestment {
            name: form.name,
            value: Money::from_decimal(form.value)?,
        },
    )?;

    Ok((StatusCode::CREATED, Json(investment)))
}

/// A route handler for deleting an investment, responds with no content.
pub async fn delete_investment_endpoint(
    State(store): State<SQLiteInvestmentStore>,
    Extension(user_id): Extension<UserID>,
    Path(investment_id): Path<InvestmentId>,
) -> Result<StatusCode, Error> {
    store.delete(user_id, investment_id)?;

    Ok(StatusCode::NO_CONTENT)
}
