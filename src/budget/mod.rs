//! Budget goals and the budget state derived from them.
//!
//! This module contains:
//! - The `BudgetStore` interface and its SQLite implementation
//! - Loading a budget summary from the transaction and budget stores
//! - Route handlers for listing budgets and setting goals

mod core;
mod list_endpoint;
mod set_goal_endpoint;
mod summary;

pub use core::{BudgetStore, SQLiteBudgetStore, create_budget_table};
pub use list_endpoint::{BudgetState, BudgetView, list_budgets_endpoint};
pub use set_goal_endpoint::set_goal_endpoint;
pub use summary::{BudgetSnapshot, load_budget_summary};
