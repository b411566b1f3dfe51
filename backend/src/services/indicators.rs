use crate::errors::ForecastError;
use crate::models::TrendFit;

/// Fewest points that define a slope.
pub const MIN_TREND_POINTS: usize = 2;

/// Rejects empty, too-short and non-finite series before any arithmetic runs.
pub fn validate_series(values: &[f64]) -> Result<(), ForecastError> {
    if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ForecastError::InvalidArgument(format!(
            "series contains a non-finite value ({}) at index {}",
            v, i
        )));
    }

    if values.len() < MIN_TREND_POINTS {
        return Err(ForecastError::InsufficientData {
            required: MIN_TREND_POINTS,
            actual: values.len(),
        });
    }

    Ok(())
}

/// Linear regression trend line for y-values using x = 0..n-1
/// Returns the fit for y = slope*x + intercept
///
/// Works on deviations from the means so a flat series fits exactly and
/// large magnitudes do not cancel. Uses iterator folds rather than mutable loops.
pub fn estimate_trend(values: &[f64]) -> Result<TrendFit, ForecastError> {
    validate_series(values)?;

    // Constant series: exact fit without touching the sums.
    if values.iter().all(|&v| v == values[0]) {
        return Ok(TrendFit {
            slope: 0.0,
            intercept: values[0],
        });
    }

    let x_mean = (values.len() - 1) as f64 / 2.0;
    let y_mean = mean(values);

    // Fold over enumerated deviations to get the centered sums.
    let (sum_dxdy, sum_dx2) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, sx2), (i, &y)| {
            let dx = i as f64 - x_mean;
            (sxy + dx * (y - y_mean), sx2 + dx * dx)
        });

    // Strictly positive for n >= 2 since the x values are distinct.
    let slope = sum_dxdy / sum_dx2;
    let intercept = y_mean - slope * x_mean;

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(ForecastError::InvalidArgument(
            "series magnitude overflows the regression".to_string(),
        ));
    }

    Ok(TrendFit { slope, intercept })
}

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Residual standard error of `fit` against `values` (n - 2 degrees of freedom).
///
/// Two points are always fitted exactly, so anything with fewer than three
/// points has no residual spread and reports 0.0.
pub fn residual_std_error(values: &[f64], fit: &TrendFit) -> f64 {
    if values.len() <= MIN_TREND_POINTS {
        return 0.0;
    }

    let sum_squared_residuals: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &y)| (y - fit.value_at(i as f64)).powi(2))
        .sum();

    (sum_squared_residuals / (values.len() - 2) as f64).sqrt()
}
