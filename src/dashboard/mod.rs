//! Dashboard endpoints: the budget overview and the spending pie chart.

mod charts;
mod summary_endpoint;

pub use charts::spending_chart_endpoint;
pub use summary_endpoint::get_summary_endpoint;
