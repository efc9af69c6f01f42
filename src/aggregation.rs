//! Derives spending totals, budget utilisation and chart data from transactions.
//!
//! Everything here is a pure function of its inputs. `spent` is never stored,
//! callers fetch the current transactions and goals and recompute on every read.

use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Serializer};

use crate::{CategoryName, Money, transaction::Transaction};

/// The budget goal for each category.
pub type Goals = BTreeMap<CategoryName, Money>;

/// The merged goal and spending for each budgeted or observed category, sorted by category.
pub type BudgetSummary = BTreeMap<CategoryName, BudgetEntry>;

/// The categories used to pick stable chart colours.
pub const DEFAULT_CANONICAL_CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Entertainment",
    "Utilities",
    "Health",
    "Other",
];

/// The chart colours, indexed by canonical category position.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884D8", "#FF00FF",
];

// ============================================================================
// CATEGORY TOTALS
// ============================================================================

/// The total amount spent in each observed category.
///
/// Categories keep the order in which they were first observed. Two totals
/// are equal if they map the same categories to the same amounts, regardless
/// of that order.
#[derive(Debug, Clone, Default)]
pub struct CategoryTotals {
    totals: HashMap<CategoryName, Money>,
    order: Vec<CategoryName>,
}

impl CategoryTotals {
    /// The total for `category`, or `None` if no transaction used it.
    pub fn get(&self, category: &str) -> Option<Money> {
        self.totals.get(category).copied()
    }

    /// Whether any transaction used `category`.
    pub fn contains(&self, category: &str) -> bool {
        self.totals.contains_key(category)
    }

    /// The categories and their totals in first observed order.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryName, Money)> + '_ {
        self.order
            .iter()
            .map(|category| (category, self.totals[category]))
    }

    /// The number of distinct categories.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no categories were observed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The sum of every category's total.
    pub fn total(&self) -> Money {
        self.totals.values().sum()
    }

    fn add(&mut self, category: &CategoryName, amount: Money) {
        match self.totals.get_mut(category) {
            Some(total) => *total += amount,
            None => {
                self.order.push(category.clone());
                self.totals.insert(category.clone(), amount);
            }
        }
    }
}

impl PartialEq for CategoryTotals {
    fn eq(&self, other: &Self) -> bool {
        self.totals == other.totals
    }
}

impl Eq for CategoryTotals {}

impl FromIterator<(CategoryName, Money)> for CategoryTotals {
    fn from_iter<T: IntoIterator<Item = (CategoryName, Money)>>(iter: T) -> Self {
        let mut totals = CategoryTotals::default();

        for (category, amount) in iter {
            totals.add(&category, amount);
        }

        totals
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

/// Sum the transaction amounts for each category.
pub fn compute_category_totals(transactions: &[Transaction]) -> CategoryTotals {
    let mut totals = CategoryTotals::default();

    for transaction in transactions {
        totals.add(&transaction.category, transaction.amount);
    }

    totals
}

// ============================================================================
// BUDGETS
// ============================================================================

/// The goal and amount spent for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BudgetEntry {
    /// The most the user wants to spend, zero when unset.
    pub goal: Money,
    /// The sum of the category's transactions.
    pub spent: Money,
}

/// Combine goals with spending for every category in either input.
///
/// Categories with a goal but no spending get `spent = 0`, and categories
/// with spending but no goal get `goal = 0`.
pub fn merge_budgets(goals: &Goals, totals: &CategoryTotals) -> BudgetSummary {
    let mut summary: BudgetSummary = goals
        .iter()
        .map(|(category, &goal)| {
            let entry = BudgetEntry {
                goal,
                spent: totals.get(category.as_ref()).unwrap_or(Money::ZERO),
            };
            (category.clone(), entry)
        })
        .collect();

    for (category, spent) in totals.iter() {
        summary
            .entry(category.clone())
            .or_insert(BudgetEntry {
                goal: Money::ZERO,
                spent,
            });
    }

    summary
}

/// How close spending is to a category's goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationLevel {
    /// At most 75% of the goal has been spent.
    Nominal,
    /// More than 75% and at most 90% of the goal has been spent.
    Warning,
    /// More than 90% of the goal has been spent.
    Critical,
}

/// The fraction of the goal that has been spent, or `None` when no goal is set.
pub fn utilization_ratio(entry: &BudgetEntry) -> Option<f64> {
    if entry.goal.cents() <= 0 {
        return None;
    }

    Some(entry.spent.cents() as f64 / entry.goal.cents() as f64)
}

/// Classify spending against the goal, or `None` when no goal is set.
pub fn utilization_level(entry: &BudgetEntry) -> Option<UtilizationLevel> {
    let goal = i128::from(entry.goal.cents());
    if goal <= 0 {
        return None;
    }

    // Compare spent / goal * 100 against the thresholds without dividing.
    let spent_percent = i128::from(entry.spent.cents()) * 100;

    let level = if spent_percent <= goal * 75 {
        UtilizationLevel::Nominal
    } else if spent_percent <= goal * 90 {
        UtilizationLevel::Warning
    } else {
        UtilizationLevel::Critical
    };

    Some(level)
}

/// Headline totals across all budget entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetOverview {
    /// Spending across all categories.
    pub total_spent: Money,
    /// The sum of all goals.
    pub total_budget: Money,
    /// Goal left over, negative when over budget.
    pub remaining: Money,
}

/// Sum the goals and spending in `summary`.
pub fn overview(summary: &BudgetSummary) -> BudgetOverview {
    let total_spent: Money = summary.values().map(|entry| entry.spent).sum();
    let total_budget: Money = summary.values().map(|entry| entry.goal).sum();

    BudgetOverview {
        total_spent,
        total_budget,
        remaining: total_budget - total_spent,
    }
}

// ============================================================================
// CHART SERIES
// ============================================================================

/// The order of slices in a chart series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeriesOrder {
    /// Categories in the order they were first observed.
    #[default]
    Observed,
    /// Canonical categories first in canonical order, then the rest as observed.
    Canonical,
}

/// How chart slices are ordered and coloured.
#[derive(Debug, Clone, Copy)]
pub struct ColorAssignment<'a> {
    /// Categories with a fixed palette slot.
    pub canonical_categories: &'a [&'a str],
    /// The colours to pick from. An empty palette falls back to [DEFAULT_PALETTE].
    pub palette: &'a [&'a str],
    /// How the slices are ordered.
    pub order: SeriesOrder,
}

impl Default for ColorAssignment<'static> {
    fn default() -> Self {
        Self {
            canonical_categories: &DEFAULT_CANONICAL_CATEGORIES,
            palette: &DEFAULT_PALETTE,
            order: SeriesOrder::Observed,
        }
    }
}

/// One slice of the spending pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    /// The category the slice represents.
    pub label: CategoryName,
    /// The amount spent in the category.
    pub value: Money,
    /// A CSS hex colour, e.g. "#0088FE".
    pub color: String,
}

/// Turn category totals into ordered, coloured chart slices.
///
/// Canonical categories always get the colour at their canonical position,
/// other categories get the colour at their position in the series. Both
/// wrap around the palette.
pub fn to_chart_series(totals: &CategoryTotals, assignment: &ColorAssignment) -> Vec<ChartSlice> {
    let palette = if assignment.palette.is_empty() {
        &DEFAULT_PALETTE[..]
    } else {
        assignment.palette
    };
    let canonical_index = |category: &str| {
        assignment
            .canonical_categories
            .iter()
            .position(|&canonical| canonical == category)
    };

    let ordered: Vec<(&CategoryName, Money)> = match assignment.order {
        SeriesOrder::Observed => totals.iter().collect(),
        SeriesOrder::Canonical => {
            let mut ordered: Vec<_> = assignment
                .canonical_categories
                .iter()
                .filter_map(|&canonical| {
                    totals
                        .iter()
                        .find(|(category, _)| category.as_ref() == canonical)
                })
                .collect();
            ordered.extend(
                totals
                    .iter()
                    .filter(|(category, _)| canonical_index(category.as_ref()).is_none()),
            );
            ordered
        }
    };

    ordered
        .into_iter()
        .enumerate()
        .map(|(position, (category, value))| {
            let slot = canonical_index(category.as_ref()).unwrap_or(position);

            ChartSlice {
                label: category.clone(),
                value,
                color: palette[slot % palette.len()].to_owned(),
            }
        })
        .collect()
}


#[cfg(test)]
mod budget_tests {
    use crate::{CategoryName, Money};

    use super::{
        BudgetEntry, BudgetSummary, CategoryTotals, Goals, UtilizationLevel, merge_budgets,
        overview, utilization_level, utilization_ratio,
    };

    fn name(category: &str) -> CategoryName {
        CategoryName::new_unchecked(category)
    }

    fn entry(goal: i64, spent: i64) -> BudgetEntry {
        BudgetEntry {
            goal: Money::from_cents(goal),
            spent: Money::from_cents(spent),
        }
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert_eq!(
            merge_budgets(&Goals::new(), &CategoryTotals::default()),
            BudgetSummary::new()
        );
    }

    #[test]
    fn goal_without_spending_has_zero_spent() {
        let goals = Goals::from([(name("Food"), Money::from_cents(40_000))]);

        let summary = merge_budgets(&goals, &CategoryTotals::default());

        assert_eq!(
            summary,
            BudgetSummary::from([(name("Food"), entry(40_000, 0))])
        );
    }

    #[test]
    fn spending_without_goal_has_zero_goal() {
        let totals = CategoryTotals::from_iter([(name("Food"), Money::from_cents(12_050))]);

        let summary = merge_budgets(&Goals::new(), &totals);

        assert_eq!(
            summary,
            BudgetSummary::from([(name("Food"), entry(0, 12_050))])
        );
    }

    #[test]
    fn merge_keeps_union_of_categories() {
        let goals = Goals::from([
            (name("Food"), Money::from_cents(40_000)),
            (name("Rent"), Money::from_cents(120_000)),
        ]);
        let totals = CategoryTotals::from_iter([
            (name("Food"), Money::from_cents(12_625)),
            (name("Transport"), Money::from_cents(6_500)),
        ]);

        let summary = merge_budgets(&goals, &totals);

        assert_eq!(
            summary,
            BudgetSummary::from([
                (name("Food"), entry(40_000, 12_625)),
                (name("Rent"), entry(120_000, 0)),
                (name("Transport"), entry(0, 6_500)),
            ])
        );
    }

    #[test]
    fn ratio_is_spent_over_goal() {
        assert_eq!(utilization_ratio(&entry(40_000, 30_000)), Some(0.75));
    }

    #[test]
    fn ratio_without_goal_is_none() {
        assert_eq!(utilization_ratio(&entry(0, 5_000)), None);
        assert_eq!(utilization_ratio(&entry(0, 0)), None);
    }

    #[test]
    fn level_boundaries_are_inclusive_below() {
        assert_eq!(
            utilization_level(&entry(40_000, 30_000)),
            Some(UtilizationLevel::Nominal)
        );
        assert_eq!(
            utilization_level(&entry(10_000, 7_501)),
            Some(UtilizationLevel::Warning)
        );
        assert_eq!(
            utilization_level(&entry(10_000, 9_000)),
            Some(UtilizationLevel::Warning)
        );
        assert_eq!(
            utilization_level(&entry(10_000, 9_001)),
            Some(UtilizationLevel::Critical)
        );
    }

    #[test]
    fn level_handles_overspending_and_no_spending() {
        assert_eq!(
            utilization_level(&entry(10_000, 25_000)),
            Some(UtilizationLevel::Critical)
        );
        assert_eq!(
            utilization_level(&entry(10_000, 0)),
            Some(UtilizationLevel::Nominal)
        );
    }

    #[test]
    fn level_without_goal_is_none() {
        assert_eq!(utilization_level(&entry(0, 5_000)), None);
    }

    #[test]
    fn level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UtilizationLevel::Warning).unwrap(),
            "\"warning\""
        );
    }

    #[test]
    fn overview_sums_goals_and_spending() {
        let summary = BudgetSummary::from([
            (name("Food"), entry(40_000, 12_625)),
            (name("Transport"), entry(0, 6_500)),
        ]);

        let overview = overview(&summary);

        assert_eq!(overview.total_budget, Money::from_cents(40_000));
        assert_eq!(overview.total_spent, Money::from_cents(19_125));
        assert_eq!(overview.remaining, Money::from_cents(20_875));
    }

    #[test]
    fn overview_remaining_goes_negative_when_over_budget() {
        let summary = BudgetSummary::from([(name("Food"), entry(1_000, 1_500))]);

        assert_eq!(overview(&summary).remaining, Money::from_cents(-500));
    }
}
