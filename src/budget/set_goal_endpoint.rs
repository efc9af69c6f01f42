use axum::{Extension, Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    CategoryName, Error, Money,
    auth::UserID,
    budget::{BudgetState, BudgetStore, BudgetView, load_budget_summary},
};

/// The request body for setting a budget goal.
#[derive(Debug, Deserialize)]
pub struct GoalForm {
    pub category: String,
    /// May be a JSON number or string.
    pub goal: Decimal,
}

/// A route handler for setting the goal for a category, responds with the updated budget.
pub async fn set_goal_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<GoalForm>,
) -> Result<Json<BudgetView>, Error> {
    let category = CategoryName::new(&form.category)?;
    let goal = Money::from_decimal(form.goal)?;

    state.budgets.set_goal(user_id, category.clone(), goal)?;

    let snapshot = load_budget_summary(&state.transactions, &state.budgets, user_id, None)?;
    let entry = snapshot
        .budgets
        .get(&category)
        .copied()
        .ok_or(Error::NotFound)?;

    Ok(Json(BudgetView::new(category, entry)))
}
