//! Transactions routes - JSON API and dashboard page

pub mod api;
pub mod page;

pub use api::{api_bar_chart, api_combined, api_init, api_pie_chart, api_statistics, api_transactions};
pub use page::page_dashboard;
