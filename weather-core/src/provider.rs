use crate::{Config, LookupError, WeatherQuery, WeatherRecord, provider::openweather::OpenWeatherProvider};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Resolves a query into current conditions with a single upstream call.
#[async_trait]
pub trait WeatherLookup: Send + Sync + Debug {
    async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherRecord, LookupError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let http = builder.build().context("Failed to build HTTP client")?;

    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| openweather::DEFAULT_BASE_URL.to_string());

    Ok(OpenWeatherProvider::with_client(base_url, http))
}
