use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::errors::ForecastError;
use crate::models::DailyPoint;

/// Expand dated observations into a contiguous daily series covering the
/// `days` calendar days that end at `end` (inclusive), oldest first.
///
/// Observations on the same day are summed, days without observations are
/// zero-filled and observations outside the window are ignored. Position in
/// the result is the time regressor, so no day is ever omitted.
pub fn zero_fill_daily<I>(
    observations: I,
    end: NaiveDate,
    days: u32,
) -> Result<Vec<DailyPoint>, ForecastError>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    if days == 0 {
        return Err(ForecastError::InvalidArgument(
            "lookback window must cover at least one day".to_string(),
        ));
    }

    let start = end
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .ok_or_else(|| {
            ForecastError::InvalidArgument(format!(
                "a {} day window ending {} starts before the first representable date",
                days, end
            ))
        })?;

    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, value) in observations {
        if !value.is_finite() {
            return Err(ForecastError::InvalidArgument(format!(
                "observation on {} is not a finite number",
                date
            )));
        }
        if date < start || date > end {
            continue;
        }
        *by_day.entry(date).or_insert(0.0) += value;
    }

    Ok(start
        .iter_days()
        .take(days as usize)
        .map(|date| DailyPoint {
            date,
            value: by_day.get(&date).copied().unwrap_or(0.0),
        })
        .collect())
}

/// Positional values of a daily series
pub fn values(points: &[DailyPoint]) -> Vec<f64> {
    points.iter().map(|p| p.value).collect()
}
