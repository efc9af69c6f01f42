//! Investment tracking: the store and its route handlers.

mod core;
mod endpoints;

pub use core::{
    Investment, InvestmentStore, NewInvestment, SQLiteInvestmentStore, create_investment_table,
};
pub use endpoints::{
    create_investment_endpoint, delete_investment_endpoint, list_investments_endpoint,
};
