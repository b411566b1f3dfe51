use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    DailyPoint, DemandForecast, DemandForecastRequest, ForecastPoint, ProductDemandForecast,
    QuantityKind, SalesForecast, SalesForecastRequest, SalesForecastSeries, SalesHistory,
    SalesProjections, SalesTrends, TrendLabel,
};
use crate::services::forecasting_service::{
    classify_trend, forecast_points, summarize, TrendPolicy,
};
use crate::services::indicators::{estimate_trend, mean, residual_std_error};
use crate::services::series_service::{values, zero_fill_daily};

/// Residual spread relative to the mean above which bands are called out
const HIGH_VARIABILITY_RATIO: f64 = 0.5;

/// Lookback/horizon of one forecast request, already validated by the caller
#[derive(Debug, Clone, Copy)]
pub struct ForecastWindow {
    pub as_of: NaiveDate,
    pub lookback_days: u32,
    pub forecast_days: u32,
}

impl ForecastWindow {
    pub fn new(as_of: Option<NaiveDate>, lookback_days: u32, forecast_days: u32) -> Self {
        Self {
            as_of: as_of.unwrap_or_else(|| Utc::now().date_naive()),
            lookback_days,
            forecast_days,
        }
    }
}

/// Revenue and order-count forecast for one tenant
pub fn sales_forecast(
    tenant_id: Uuid,
    request: &SalesForecastRequest,
    window: ForecastWindow,
    policy: &TrendPolicy,
    min_history_days: u32,
) -> Result<SalesForecast, AppError> {
    info!(
        "Generating sales forecast for tenant {} ({} orders, {} days back, {} days ahead)",
        tenant_id,
        request.orders.len(),
        window.lookback_days,
        window.forecast_days
    );

    let revenue_history = zero_fill_daily(
        request.orders.iter().map(|o| (o.date, o.total)),
        window.as_of,
        window.lookback_days,
    )?;
    let order_history = zero_fill_daily(
        request.orders.iter().map(|o| (o.date, 1.0)),
        window.as_of,
        window.lookback_days,
    )?;

    let revenue = values(&revenue_history);
    let orders = values(&order_history);
    let horizon = window.forecast_days as usize;

    let revenue_forecast = forecast_points(&revenue, window.as_of, horizon)?;
    let order_forecast = forecast_points(&orders, window.as_of, horizon)?;

    let trends = SalesTrends {
        revenue: classify_trend(&revenue, policy)?,
        orders: classify_trend(&orders, policy)?,
        average_order_value: average_order_value_trend(&revenue_history, &order_history, policy)?,
    };

    let projections = SalesProjections {
        revenue: summarize(&predicted(&revenue_forecast), QuantityKind::Monetary),
        orders: summarize(&predicted(&order_forecast), QuantityKind::Count),
    };

    let warnings = history_warnings(&revenue, &orders, min_history_days)?;
    for warning in &warnings {
        warn!("Tenant {}: {}", tenant_id, warning);
    }

    Ok(SalesForecast {
        tenant_id,
        lookback_days: window.lookback_days,
        forecast_days: window.forecast_days,
        historical: SalesHistory {
            revenue: revenue_history,
            orders: order_history,
        },
        forecast: SalesForecastSeries {
            revenue: revenue_forecast,
            orders: order_forecast,
        },
        trends,
        projections,
        warnings,
        generated_at: Utc::now(),
    })
}

/// Unit demand forecast per product. Products without sales inside the window
/// are left out and named in a warning.
pub fn demand_forecast(
    tenant_id: Uuid,
    request: &DemandForecastRequest,
    window: ForecastWindow,
    policy: &TrendPolicy,
    min_history_days: u32,
) -> Result<DemandForecast, AppError> {
    info!(
        "Generating demand forecast for tenant {} ({} line items, {} days back, {} days ahead)",
        tenant_id,
        request.items.len(),
        window.lookback_days,
        window.forecast_days
    );

    let mut by_product: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for item in &request.items {
        let product_id = item.product_id.trim();
        if product_id.is_empty() {
            return Err(AppError::Validation(
                "line item is missing a product_id".to_string(),
            ));
        }
        by_product
            .entry(product_id)
            .or_default()
            .push((item.date, item.quantity));
    }

    let horizon = window.forecast_days as usize;
    let mut products = Vec::with_capacity(by_product.len());
    let mut inactive = Vec::new();
    let mut sparse = Vec::new();

    for (product_id, observations) in by_product {
        let history = zero_fill_daily(observations, window.as_of, window.lookback_days)?;
        let units = values(&history);

        let days_with_sales = active_days(&units);
        if days_with_sales == 0 {
            inactive.push(product_id.to_string());
            continue;
        }
        if days_with_sales < min_history_days as usize {
            sparse.push(product_id.to_string());
        }

        let forecast = forecast_points(&units, window.as_of, horizon)?;
        products.push(ProductDemandForecast {
            product_id: product_id.to_string(),
            units_sold: units.iter().sum(),
            trend: classify_trend(&units, policy)?,
            projections: summarize(&predicted(&forecast), QuantityKind::Count),
            forecast,
        });
    }

    let mut warnings = Vec::new();
    if !inactive.is_empty() {
        warnings.push(format!(
            "No sales inside the lookback window for: {}.",
            inactive.join(", ")
        ));
    }
    if !sparse.is_empty() {
        warnings.push(format!(
            "Fewer than {} days with sales for: {}. Forecasts may be less reliable.",
            min_history_days,
            sparse.join(", ")
        ));
    }
    for warning in &warnings {
        warn!("Tenant {}: {}", tenant_id, warning);
    }

    Ok(DemandForecast {
        tenant_id,
        lookback_days: window.lookback_days,
        forecast_days: window.forecast_days,
        products,
        warnings,
        generated_at: Utc::now(),
    })
}

/// Order value trend over the days that actually had orders; days without
/// orders carry no order value and are skipped rather than zero-filled.
fn average_order_value_trend(
    revenue: &[DailyPoint],
    orders: &[DailyPoint],
    policy: &TrendPolicy,
) -> Result<TrendLabel, AppError> {
    let daily_aov: Vec<f64> = revenue
        .iter()
        .zip(orders)
        .filter(|(_, o)| o.value > 0.0)
        .map(|(r, o)| r.value / o.value)
        .collect();

    if daily_aov.len() < 2 {
        return Ok(TrendLabel::Stable);
    }
    Ok(classify_trend(&daily_aov, policy)?)
}

fn predicted(points: &[ForecastPoint]) -> Vec<f64> {
    points.iter().map(|p| p.predicted_value).collect()
}

fn active_days(values: &[f64]) -> usize {
    values.iter().filter(|v| **v != 0.0).count()
}

/// Data quality notes attached to a sales forecast
fn history_warnings(
    revenue: &[f64],
    orders: &[f64],
    min_history_days: u32,
) -> Result<Vec<String>, AppError> {
    let mut warnings = Vec::new();

    let active = active_days(orders);
    if active == 0 {
        warnings.push(
            "No orders recorded in the lookback window; the forecast is flat at zero.".to_string(),
        );
        return Ok(warnings);
    }

    if active < min_history_days as usize {
        warnings.push(format!(
            "Limited order history ({} days with orders). Forecasts may be less reliable.",
            active
        ));
    }

    let fit = estimate_trend(revenue)?;
    let revenue_mean = mean(revenue);
    if revenue_mean > 0.0 && residual_std_error(revenue, &fit) / revenue_mean > HIGH_VARIABILITY_RATIO {
        warnings.push(
            "High day-to-day revenue variability detected. Confidence intervals are wider."
                .to_string(),
        );
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineItemRecord, OrderRecord};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(lookback: u32, ahead: u32) -> ForecastWindow {
        ForecastWindow::new(Some(date(2024, 5, 5)), lookback, ahead)
    }

    fn order(day: u32, total: f64) -> OrderRecord {
        OrderRecord {
            date: date(2024, 5, day),
            total,
        }
    }

    #[test]
    fn test_sales_forecast_growing_revenue() {
        // One order per day, revenue growing by 10 a day
        let request = SalesForecastRequest {
            as_of: None,
            orders: (1..=5).map(|d| order(d, 90.0 + 10.0 * d as f64)).collect(),
        };

        let result =
            sales_forecast(Uuid::nil(), &request, window(5, 3), &TrendPolicy::default(), 3).unwrap();

        assert_eq!(result.historical.revenue.len(), 5);
        assert_eq!(result.historical.revenue[0].date, date(2024, 5, 1));
        assert_eq!(result.forecast.revenue.len(), 3);
        assert_eq!(result.forecast.revenue[0].date, date(2024, 5, 6));
        assert!((result.forecast.revenue[0].predicted_value - 150.0).abs() < 1e-9);
        assert!((result.forecast.revenue[2].predicted_value - 170.0).abs() < 1e-9);

        assert_eq!(result.trends.revenue, TrendLabel::Increasing);
        assert_eq!(result.trends.orders, TrendLabel::Stable);
        assert_eq!(result.trends.average_order_value, TrendLabel::Increasing);

        assert!((result.projections.revenue.next_period - 480.0).abs() < 1e-9);
        assert_eq!(result.projections.orders.next_period, 3.0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_sales_forecast_zero_fills_quiet_days() {
        let request = SalesForecastRequest {
            as_of: None,
            orders: vec![order(1, 40.0), order(1, 60.0), order(4, 30.0)],
        };

        let result =
            sales_forecast(Uuid::nil(), &request, window(5, 2), &TrendPolicy::default(), 3).unwrap();

        let revenue: Vec<f64> = result.historical.revenue.iter().map(|p| p.value).collect();
        let orders: Vec<f64> = result.historical.orders.iter().map(|p| p.value).collect();
        assert_eq!(revenue, vec![100.0, 0.0, 0.0, 30.0, 0.0]);
        assert_eq!(orders, vec![2.0, 0.0, 0.0, 1.0, 0.0]);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.starts_with("Limited order history (2 days")));
    }

    #[test]
    fn test_sales_forecast_without_orders() {
        let request = SalesForecastRequest {
            as_of: None,
            orders: Vec::new(),
        };

        let result =
            sales_forecast(Uuid::nil(), &request, window(7, 7), &TrendPolicy::default(), 3).unwrap();

        assert!(result.forecast.revenue.iter().all(|p| p.predicted_value == 0.0));
        assert_eq!(result.trends.revenue, TrendLabel::Stable);
        assert_eq!(result.projections.revenue.next_week, 0.0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_sales_forecast_single_day_window_is_insufficient() {
        let request = SalesForecastRequest {
            as_of: None,
            orders: vec![order(5, 10.0)],
        };

        let result = sales_forecast(Uuid::nil(), &request, window(1, 7), &TrendPolicy::default(), 3);
        assert!(matches!(result, Err(AppError::InsufficientData(_))));
    }

    #[test]
    fn test_demand_forecast_per_product() {
        let item = |product: &str, day: u32, quantity: f64| LineItemRecord {
            product_id: product.to_string(),
            date: date(2024, 5, day),
            quantity,
        };
        let mut request = DemandForecastRequest {
            as_of: None,
            items: vec![
                item("sku-b", 1, 10.0),
                item("sku-b", 2, 8.0),
                item("sku-b", 3, 6.0),
                item("sku-b", 4, 4.0),
                item("sku-b", 5, 2.0),
                item("sku-a", 1, 1.0),
                item("sku-a", 2, 2.0),
                item("sku-a", 3, 3.0),
                item("sku-a", 4, 4.0),
                item("sku-a", 5, 5.0),
                item("sku-old", 1, 3.0),
            ],
        };
        // sku-old only sold on 2024-04-01, which is outside the window
        request.items[10].date = date(2024, 4, 1);

        let result =
            demand_forecast(Uuid::nil(), &request, window(5, 7), &TrendPolicy::default(), 3).unwrap();

        let ids: Vec<&str> = result.products.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, vec!["sku-a", "sku-b"]);

        let a = &result.products[0];
        assert_eq!(a.units_sold, 15.0);
        assert_eq!(a.trend, TrendLabel::Increasing);
        assert!((a.forecast[0].predicted_value - 6.0).abs() < 1e-9);
        // 6 + 7 + ... + 12
        assert_eq!(a.projections.next_week, 63.0);

        let b = &result.products[1];
        assert_eq!(b.trend, TrendLabel::Decreasing);
        assert!(b.forecast.iter().all(|p| p.predicted_value >= 0.0));
        assert!(b.forecast[0].predicted_value.abs() < 1e-9);

        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("sku-old"));
    }

    #[test]
    fn test_demand_forecast_rejects_blank_product() {
        let request = DemandForecastRequest {
            as_of: None,
            items: vec![LineItemRecord {
                product_id: "  ".to_string(),
                date: date(2024, 5, 1),
                quantity: 1.0,
            }],
        };
        let result = demand_forecast(Uuid::nil(), &request, window(5, 7), &TrendPolicy::default(), 3);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_demand_forecast_warns_on_sparse_products() {
        let item = |product: &str, day: u32, quantity: f64| LineItemRecord {
            product_id: product.to_string(),
            date: date(2024, 5, day),
            quantity,
        };
        let request = DemandForecastRequest {
            as_of: None,
            items: vec![
                item("sku-steady", 1, 4.0),
                item("sku-steady", 2, 4.0),
                item("sku-steady", 3, 4.0),
                item("sku-steady", 4, 4.0),
                item("sku-steady", 5, 4.0),
                item("sku-rare", 2, 6.0),
                item("sku-rare", 4, 2.0),
            ],
        };

        let result =
            demand_forecast(Uuid::nil(), &request, window(5, 7), &TrendPolicy::default(), 3).unwrap();

        // Sparse products are still forecast, only flagged
        assert_eq!(result.products.len(), 2);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Fewer than 3 days with sales"));
        assert!(result.warnings[0].contains("sku-rare"));
        assert!(!result.warnings[0].contains("sku-steady"));
    }
}
