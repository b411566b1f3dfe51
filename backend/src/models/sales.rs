use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::forecast::{DailyPoint, ForecastPoint, ProjectionSummary, TrendLabel};

/// A completed order as exported by the order service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub date: NaiveDate,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesForecastRequest {
    /// Last day of the lookback window; defaults to today (UTC)
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub orders: Vec<OrderRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesHistory {
    pub revenue: Vec<DailyPoint>,
    pub orders: Vec<DailyPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesForecastSeries {
    pub revenue: Vec<ForecastPoint>,
    pub orders: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesTrends {
    pub revenue: TrendLabel,
    pub orders: TrendLabel,
    pub average_order_value: TrendLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesProjections {
    pub revenue: ProjectionSummary,
    pub orders: ProjectionSummary,
}

/// Sales forecast for one tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesForecast {
    pub tenant_id: Uuid,
    pub lookback_days: u32,
    pub forecast_days: u32,
    pub historical: SalesHistory,
    pub forecast: SalesForecastSeries,
    pub trends: SalesTrends,
    pub projections: SalesProjections,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Units of one product sold on one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub product_id: String,
    pub date: NaiveDate,
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandForecastRequest {
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<LineItemRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDemandForecast {
    pub product_id: String,
    pub units_sold: f64,
    pub trend: TrendLabel,
    pub forecast: Vec<ForecastPoint>,
    pub projections: ProjectionSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandForecast {
    pub tenant_id: Uuid,
    pub lookback_days: u32,
    pub forecast_days: u32,
    pub products: Vec<ProductDemandForecast>,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
