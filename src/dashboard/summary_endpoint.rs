use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Serialize;

use crate::{
    Error,
    aggregation::{BudgetOverview, ChartSlice, ColorAssignment, overview, to_chart_series},
    auth::UserID,
    budget::{BudgetState, load_budget_summary},
    date_range::DateRangeQuery,
};

/// The headline numbers and spending breakdown shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub overview: BudgetOverview,
    /// Spending per category, coloured for a pie chart.
    pub chart: Vec<ChartSlice>,
}

/// A route handler for the dashboard summary.
///
/// The optional `from` and `to` query parameters limit which transactions count as spending.
pub async fn get_summary_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<SummaryResponse>, Error> {
    let snapshot = load_budget_summary(
        &state.transactions,
        &state.budgets,
        user_id,
        query.into_range()?,
    )?;

    Ok(Json(SummaryResponse {
        overview: overview(&snapshot.budgets),
        chart: to_chart_series(&snapshot.totals, &ColorAssignment::default()),
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{get_test_server, register},
    };

    #[tokio::test]
    async fn summary_for_new_user_is_all_zero() {
        let server = get_test_server();
        let cookie = register(&server, "alice@example.com").await;

        let response = server.get(endpoints::SUMMARY).add_cookie(cookie).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({
                "total_spent": "0.00",
                "total_budget": "0.00",
                "remaining": "0.00",
                "chart": []
            })
        );
    }

    #[tokio::test]
    async fn summary_totals_budgets_and_spending() {
        let server = get_test_server();
        let cookie = register(&server, "alice@example.com").await;
        for (amount, category) in [("65", "Transport"), ("120.50", "Food"), ("5.75", "Food")] {
            server
                .post(endpoints::TRANSACTIONS)
                .add_cookie(cookie.clone())
                .json(&json!({
                    "description": "Spending",
                    "amount": amount,
                    "category": category
                }))
                .await;
        }
        server
            .put(endpoints::BUDGETS)
            .add_cookie(cookie.clone())
            .json(&json!({ "category": "Food", "goal": 100 }))
            .await;

        let response = server.get(endpoints::SUMMARY).add_cookie(cookie).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({
                "total_spent": "191.25",
                "total_budget": "100.00",
                "remaining": "-91.25",
                "chart": [
                    { "label": "Food", "value": "126.25", "color": "#0088FE" },
                    { "label": "Transport", "value": "65.00", "color": "#00C49F" }
                ]
            })
        );
    }
}
