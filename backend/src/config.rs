use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::services::forecasting_service::TrendPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("{0}")]
    Inconsistent(String),
}

/// Runtime settings for the analytics service, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub trend_policy: TrendPolicy,
    pub default_lookback_days: u32,
    pub max_lookback_days: u32,
    pub default_forecast_days: u32,
    pub max_forecast_days: u32,
    /// Below this many days of history a warning is attached to the response
    pub min_history_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            trend_policy: TrendPolicy::default(),
            default_lookback_days: 30,
            max_lookback_days: 730,
            default_forecast_days: 30,
            max_forecast_days: 365,
            min_history_days: 14,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let stable_band = parse_or(&lookup, "TREND_STABLE_BAND", defaults.trend_policy.stable_band)?;
        let trend_policy = TrendPolicy::new(stable_band).map_err(|_| ConfigError::Invalid {
            key: "TREND_STABLE_BAND",
            value: stable_band.to_string(),
        })?;

        let config = Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            trend_policy,
            default_lookback_days: parse_or(&lookup, "DEFAULT_LOOKBACK_DAYS", defaults.default_lookback_days)?,
            max_lookback_days: parse_or(&lookup, "MAX_LOOKBACK_DAYS", defaults.max_lookback_days)?,
            default_forecast_days: parse_or(&lookup, "DEFAULT_FORECAST_DAYS", defaults.default_forecast_days)?,
            max_forecast_days: parse_or(&lookup, "MAX_FORECAST_DAYS", defaults.max_forecast_days)?,
            min_history_days: parse_or(&lookup, "MIN_HISTORY_DAYS", defaults.min_history_days)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_lookback_days == 0 || self.default_lookback_days > self.max_lookback_days {
            return Err(ConfigError::Inconsistent(format!(
                "DEFAULT_LOOKBACK_DAYS ({}) must be between 1 and MAX_LOOKBACK_DAYS ({})",
                self.default_lookback_days, self.max_lookback_days
            )));
        }
        if self.default_forecast_days == 0 || self.default_forecast_days > self.max_forecast_days {
            return Err(ConfigError::Inconsistent(format!(
                "DEFAULT_FORECAST_DAYS ({}) must be between 1 and MAX_FORECAST_DAYS ({})",
                self.default_forecast_days, self.max_forecast_days
            )));
        }
        Ok(())
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}
