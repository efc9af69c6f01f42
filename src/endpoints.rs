//! The API endpoints URIs.
//!
//! Endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use axum's path syntax.

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route to access users.
pub const USERS: &str = "/api/users";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list budgets and set budget goals.
pub const BUDGETS: &str = "/api/budgets";
/// The route for the spending totals against the budget.
pub const SUMMARY: &str = "/api/summary";
/// The route for the spending by category pie chart.
pub const SPENDING_CHART: &str = "/api/charts/spending";
/// The route to list and record investments.
pub const INVESTMENTS: &str = "/api/investments";
/// The route to access a single investment.
pub const INVESTMENT: &str = "/api/investments/{investment_id}";

/// Replace the first `{parameter}` in `endpoint_path` with `id`.
///
/// Paths without a parameter are returned unchanged.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };
    let end = endpoint_path[start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| start + offset + 1);

    format!("{}{}{}", &endpoint_path[..start], id, &endpoint_path[end..])
}
