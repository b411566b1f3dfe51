//! Sales and demand forecasting for the storefront back-office.
//!
//! The forecasting core (`services::indicators`, `services::forecasting_service`)
//! is pure arithmetic over a zero-filled daily series; the HTTP layer turns
//! order and line-item exports into those series and shapes the responses.

pub mod app;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
mod routes;
pub mod services;
pub mod state;

pub use errors::{AppError, ForecastError};
pub use models::{ForecastResult, TrendFit, TrendLabel};
pub use services::forecasting_service::{classify_trend, forecast, TrendPolicy};
pub use services::indicators::estimate_trend;
