//! Dashboard module
//!
//! Provides an overview page with KPIs and charts summarising the logged in
//! user's expenses.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
