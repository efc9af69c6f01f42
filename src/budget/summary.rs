//! Derives a user's budget state from the transaction and budget stores.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    aggregation::{BudgetSummary, CategoryTotals, compute_category_totals, merge_budgets},
    auth::UserID,
    budget::BudgetStore,
    transaction::TransactionStore,
};

/// Spending totals and merged budget entries computed from one read of the stores.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSnapshot {
    /// The amount spent per category in observed order.
    pub totals: CategoryTotals,
    /// Goals merged with spending, one entry per budgeted or observed category.
    pub budgets: BudgetSummary,
}

/// Fetch `owner`'s transactions and goals and derive their budget state.
///
/// When `date_range` is set only transactions dated within it count towards spending.
///
/// # Errors
/// Returns any error raised by either store.
pub fn load_budget_summary(
    transactions: &impl TransactionStore,
    budgets: &impl BudgetStore,
    owner: UserID,
    date_range: Option<RangeInclusive<Date>>,
) -> Result<BudgetSnapshot, Error> {
    let transactions = match date_range {
        Some(date_range) => transactions.list_in_range(owner, date_range)?,
        None => transactions.list(owner)?,
    };
    let goals = budgets.list(owner)?;

    let totals = compute_category_totals(&transactions);
    let budgets = merge_budgets(&goals, &totals);

    Ok(BudgetSnapshot { totals, budgets })
}
