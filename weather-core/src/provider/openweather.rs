use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{LookupError, WeatherQuery, WeatherRecord};

use super::WeatherLookup;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherRecord, LookupError> {
        debug!(city = %query.city, url = %self.base_url, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query.city.as_str()),
                ("appid", query.api_key.as_str()),
                ("units", query.units.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        debug!(%status, "OpenWeather responded");

        // OpenWeather answers unknown cities with a 404 status as well as `cod: "404"`.
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }
        if !status.is_success() {
            return Err(LookupError::Http { status });
        }

        let body = res.text().await?;
        parse_current(&body)
    }
}

#[derive(Debug, Deserialize)]
struct OwStatus {
    #[serde(default)]
    cod: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

fn parse_current(body: &str) -> Result<WeatherRecord, LookupError> {
    let status: OwStatus = serde_json::from_str(body).map_err(malformed)?;
    if status.cod.as_ref().is_some_and(signals_not_found) {
        return Err(LookupError::NotFound);
    }

    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(malformed)?;

    let description = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| LookupError::MalformedResponse("`weather` list is empty".to_string()))?;

    Ok(WeatherRecord {
        description,
        temperature_c: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
    })
}

/// `cod` arrives as a string on errors and as a number on success.
fn signals_not_found(cod: &Value) -> bool {
    match cod {
        Value::String(s) => s.trim() == "404",
        Value::Number(n) => n.as_i64() == Some(404),
        _ => false,
    }
}

fn malformed(err: serde_json::Error) -> LookupError {
    LookupError::MalformedResponse(err.to_string())
}

#[async_trait]
impl WeatherLookup for OpenWeatherProvider {
    async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherRecord, LookupError> {
        let result = self.fetch_current(query).await;
        if let Err(err) = &result {
            warn!(city = %query.city, error = %err, "weather lookup failed");
        }
        result
    }
}
