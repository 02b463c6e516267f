use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use skycast::cache::WeatherCache;
use skycast::config::SkycastConfig;
use skycast::provider::OwmClient;
use skycast::resolver::WeatherService;
use skycast::web;

#[tokio::main]
async fn main() -> Result<()> {
    let config = SkycastConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    if config.weather.api_key.is_none() {
        tracing::warn!(
            "No OpenWeatherMap API key configured. Set SKYCAST_WEATHER__API_KEY or add it to the config file."
        );
    }

    let provider = OwmClient::new(&config)?;
    let cache = WeatherCache::new(Duration::from_secs(u64::from(config.cache.ttl_minutes) * 60));
    let service = Arc::new(WeatherService::new(Box::new(provider), cache));

    web::run(service, config.server.port).await
}
