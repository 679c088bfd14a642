pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod observability;
pub mod state;
