mod forecast;
mod sales;

pub use forecast::{
    DailyPoint, ForecastPoint, ForecastResult, ProjectionSummary, QuantityKind, TrendFit,
    TrendLabel,
};
pub use sales::{
    DemandForecast, DemandForecastRequest, LineItemRecord, OrderRecord, ProductDemandForecast,
    SalesForecast, SalesForecastRequest, SalesForecastSeries, SalesHistory, SalesProjections,
    SalesTrends,
};
