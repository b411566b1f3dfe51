pub mod analytics_service;
pub mod forecasting_service;
pub mod indicators;
pub mod series_service;
