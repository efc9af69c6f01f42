//! ECharts option documents built from chart series.
//!
//! Rendering happens on the client, the server only describes the chart.

use axum::{
    Extension,
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};
use charming::{
    Chart,
    component::{Legend, Title},
    element::{Color, Tooltip, Trigger},
    series::Pie,
};

use crate::{
    Error,
    aggregation::{ChartSlice, ColorAssignment, to_chart_series},
    auth::UserID,
    budget::{BudgetState, load_budget_summary},
    date_range::DateRangeQuery,
};

/// A pie chart of spending per category.
///
/// Slice colours are passed as the chart palette in slice order, so each
/// slice keeps the colour assigned in the series.
pub fn spending_chart(series: &[ChartSlice]) -> Chart {
    let colors: Vec<Color> = series
        .iter()
        .map(|slice| Color::from(slice.color.as_str()))
        .collect();
    let data: Vec<(f64, &str)> = series
        .iter()
        .map(|slice| (slice.value.as_f64(), slice.label.as_ref()))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by category"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("0"))
        .color(colors)
        .series(Pie::new().name("Spending").radius("60%").data(data))
}

/// A route handler that responds with the ECharts options for the spending pie chart.
pub async fn spending_chart_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, Error> {
    let snapshot = load_budget_summary(
        &state.transactions,
        &state.budgets,
        user_id,
        query.into_range()?,
    )?;
    let series = to_chart_series(&snapshot.totals, &ColorAssignment::default());

    Ok((
        [(CONTENT_TYPE, "application/json")],
        spending_chart(&series).to_string(),
    ))
}
