use anyhow::Context;
use tokio::net::TcpListener;

use storefront_analytics::app;
use storefront_analytics::config::AppConfig;
use storefront_analytics::logging::{init_logging, LoggingConfig};
use storefront_analytics::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(&LoggingConfig::from_env()).context("failed to initialize logging")?;

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        "Trend stable band {:.3}, lookback {}d (max {}d), forecast {}d (max {}d)",
        config.trend_policy.stable_band,
        config.default_lookback_days,
        config.max_lookback_days,
        config.default_forecast_days,
        config.max_forecast_days
    );

    let addr = config.bind_addr;
    let app = app::create_app(AppState::new(config));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Storefront analytics running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
