pub mod adapter;
pub mod app;
pub mod charts;
pub mod client;
pub mod config;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod panels;
pub mod payload;
pub mod state;
pub mod ui;

pub use app::router;
pub use client::{ApiClient, SalesBackend};
pub use config::DashboardConfig;
pub use state::AppState;
