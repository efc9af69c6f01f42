use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use serde::Serialize;

use crate::{
    AppState, CategoryName, Error, Money,
    aggregation::{BudgetEntry, UtilizationLevel, utilization_level, utilization_ratio},
    auth::UserID,
    budget::{SQLiteBudgetStore, load_budget_summary},
    date_range::DateRangeQuery,
    transaction::SQLiteTransactionStore,
};

/// The stores needed to derive budget state.
#[derive(Debug, Clone)]
pub struct BudgetState {
    pub transactions: SQLiteTransactionStore,
    pub budgets: SQLiteBudgetStore,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: SQLiteTransactionStore::from_ref(state),
            budgets: SQLiteBudgetStore::from_ref(state),
        }
    }
}

/// One category's budget as returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetView {
    pub category: CategoryName,
    pub goal: Money,
    pub spent: Money,
    /// `spent / goal`, or null when no goal is set.
    pub utilization: Option<f64>,
    pub level: Option<UtilizationLevel>,
}

impl BudgetView {
    pub(crate) fn new(category: CategoryName, entry: BudgetEntry) -> Self {
        Self {
            category,
            goal: entry.goal,
            spent: entry.spent,
            utilization: utilization_ratio(&entry),
            level: utilization_level(&entry),
        }
    }
}

/// A route handler for listing the user's budgets sorted by category.
///
/// The optional `from` and `to` query parameters limit which transactions count as spending.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<BudgetView>>, Error> {
    let snapshot = load_budget_summary(
        &state.transactions,
        &state.budgets,
        user_id,
        query.into_range()?,
    )?;

    let budgets = snapshot
        .budgets
        .into_iter()
        .map(|(category, entry)| BudgetView::new(category, entry))
        .collect();

    Ok(Json(budgets))
}
