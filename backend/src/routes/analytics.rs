use axum::extract::{Path, Query, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::{DemandForecast, DemandForecastRequest, SalesForecast, SalesForecastRequest};
use crate::services::analytics_service::{self, ForecastWindow};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:tenant_id/sales-forecast", post(post_sales_forecast))
        .route("/:tenant_id/demand-forecast", post(post_demand_forecast))
}

#[derive(Debug, Deserialize)]
struct ForecastQuery {
    /// Lookback window in days
    period: Option<u32>,
    /// Days to forecast ahead
    forecast: Option<u32>,
}

impl ForecastQuery {
    fn window(
        &self,
        config: &AppConfig,
        as_of: Option<chrono::NaiveDate>,
    ) -> Result<ForecastWindow, AppError> {
        let period = self.period.unwrap_or(config.default_lookback_days);
        if period == 0 || period > config.max_lookback_days {
            return Err(AppError::Validation(format!(
                "period must be between 1 and {} days",
                config.max_lookback_days
            )));
        }

        let forecast = self.forecast.unwrap_or(config.default_forecast_days);
        if forecast == 0 || forecast > config.max_forecast_days {
            return Err(AppError::Validation(format!(
                "forecast must be between 1 and {} days",
                config.max_forecast_days
            )));
        }

        Ok(ForecastWindow::new(as_of, period, forecast))
    }
}

async fn post_sales_forecast(
    Path(tenant_id): Path<Uuid>,
    Query(params): Query<ForecastQuery>,
    State(state): State<AppState>,
    Json(request): Json<SalesForecastRequest>,
) -> Result<Json<SalesForecast>, AppError> {
    info!("POST /api/analytics/{}/sales-forecast", tenant_id);
    let window = params.window(&state.config, request.as_of)?;

    analytics_service::sales_forecast(
        tenant_id,
        &request,
        window,
        &state.config.trend_policy,
        state.config.min_history_days,
    )
    .map(Json)
    .map_err(|e| {
        error!("Sales forecast failed for tenant {}: {}", tenant_id, e);
        e
    })
}

async fn post_demand_forecast(
    Path(tenant_id): Path<Uuid>,
    Query(params): Query<ForecastQuery>,
    State(state): State<AppState>,
    Json(request): Json<DemandForecastRequest>,
) -> Result<Json<DemandForecast>, AppError> {
    info!("POST /api/analytics/{}/demand-forecast", tenant_id);
    let window = params.window(&state.config, request.as_of)?;

    analytics_service::demand_forecast(
        tenant_id,
        &request,
        window,
        &state.config.trend_policy,
        state.config.min_history_days,
    )
    .map(Json)
    .map_err(|e| {
        error!("Demand forecast failed for tenant {}: {}", tenant_id, e);
        e
    })
}
