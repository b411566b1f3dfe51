use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::errors::ForecastError;
use crate::models::{
    ForecastPoint, ForecastResult, ProjectionSummary, QuantityKind, TrendFit, TrendLabel,
};
use crate::services::indicators::{estimate_trend, mean, residual_std_error, validate_series};

/// Two-sided 95% normal quantile used for forecast bands
const Z_95: f64 = 1.96;

/// Periods summed into the "next week" projection
const WEEK_PERIODS: usize = 7;

/// Decides when a fitted trend is flat enough to call `stable`.
///
/// The fitted change across the whole window, `|slope * (n - 1)|`, is compared
/// against `stable_band * |mean|`. A band of 0.0 degrades to a bare sign check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPolicy {
    pub stable_band: f64,
}

impl Default for TrendPolicy {
    fn default() -> Self {
        Self { stable_band: 0.02 }
    }
}

impl TrendPolicy {
    pub fn new(stable_band: f64) -> Result<Self, ForecastError> {
        if !stable_band.is_finite() || stable_band < 0.0 {
            return Err(ForecastError::InvalidArgument(format!(
                "stable band must be a finite, non-negative fraction, got {}",
                stable_band
            )));
        }
        Ok(Self { stable_band })
    }
}

impl TrendLabel {
    /// Label a fit computed over `len` points whose mean is `series_mean`
    pub fn from_fit(fit: &TrendFit, len: usize, series_mean: f64, policy: &TrendPolicy) -> Self {
        let window_change = fit.slope * len.saturating_sub(1) as f64;
        let band = policy.stable_band * series_mean.abs();

        if window_change.abs() <= band {
            TrendLabel::Stable
        } else if fit.slope > 0.0 {
            TrendLabel::Increasing
        } else {
            TrendLabel::Decreasing
        }
    }
}

fn validate_periods(periods: usize) -> Result<(), ForecastError> {
    if periods == 0 {
        return Err(ForecastError::InvalidArgument(
            "periods must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Project `periods` future values by extending the fitted line past the last
/// historical index. Negative projections are floored to zero.
pub fn forecast(series: &[f64], periods: usize) -> Result<ForecastResult, ForecastError> {
    validate_series(series)?;
    validate_periods(periods)?;

    let fit = estimate_trend(series)?;
    let n = series.len();

    debug!(
        "Fitted trend over {} points: slope={:.4}, intercept={:.4}",
        n, fit.slope, fit.intercept
    );

    let values = (0..periods)
        .map(|k| projected(&fit, n + k).map(|v| v.max(0.0)))
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(ForecastResult {
        count: values.len(),
        values,
    })
}

/// Fitted value at index `x`; fails if the line leaves the f64 range there
fn projected(fit: &TrendFit, x: usize) -> Result<f64, ForecastError> {
    let value = fit.value_at(x as f64);
    if !value.is_finite() {
        return Err(ForecastError::InvalidArgument(format!(
            "projection at index {} overflows",
            x
        )));
    }
    Ok(value)
}

/// Label the direction of `series` under `policy`
pub fn classify_trend(series: &[f64], policy: &TrendPolicy) -> Result<TrendLabel, ForecastError> {
    let fit = estimate_trend(series)?;
    Ok(TrendLabel::from_fit(&fit, series.len(), mean(series), policy))
}

/// Dated forecast with 95% confidence bounds.
///
/// The first point is dated the day after `last_date`. Bands widen with the
/// horizon and are derived from the residual standard error of the fit.
pub fn forecast_points(
    series: &[f64],
    last_date: NaiveDate,
    periods: usize,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    validate_series(series)?;
    validate_periods(periods)?;

    let fit = estimate_trend(series)?;
    let std_error = residual_std_error(series, &fit);
    if !std_error.is_finite() {
        return Err(ForecastError::InvalidArgument(
            "series spread overflows the confidence bounds".to_string(),
        ));
    }
    let n = series.len();

    let points = (0..periods)
        .map(|k| {
            let raw = projected(&fit, n + k)?;
            let day = (k + 1) as f64;
            let date = last_date
                .checked_add_signed(Duration::days(k as i64 + 1))
                .ok_or_else(|| {
                    ForecastError::InvalidArgument(format!(
                        "forecast horizon runs past the last representable date after {}",
                        last_date
                    ))
                })?;

            // Confidence intervals widen with forecast horizon
            let confidence_factor = Z_95 * std_error * (1.0 + day / periods as f64);

            Ok(ForecastPoint {
                date,
                predicted_value: raw.max(0.0),
                lower_bound: (raw - confidence_factor).max(0.0),
                upper_bound: (raw + confidence_factor).max(0.0),
                confidence_level: 0.95,
            })
        })
        .collect::<Result<Vec<_>, ForecastError>>()?;

    Ok(points)
}

/// Sum the first week and the whole horizon. Counts round to the nearest
/// integer; money keeps its fractions.
pub fn summarize(values: &[f64], kind: QuantityKind) -> ProjectionSummary {
    let next_week: f64 = values.iter().take(WEEK_PERIODS).sum();
    let next_period: f64 = values.iter().sum();

    match kind {
        QuantityKind::Monetary => ProjectionSummary {
            next_week,
            next_period,
        },
        QuantityKind::Count => ProjectionSummary {
            next_week: next_week.round(),
            next_period: next_period.round(),
        },
    }
}
