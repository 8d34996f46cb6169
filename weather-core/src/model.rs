use serde::{Deserialize, Serialize};

/// Unit system requested from the upstream API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Units {
    #[default]
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub city: String,
    pub api_key: String,
    pub units: Units,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            api_key: api_key.into(),
            units: Units::Metric,
        }
    }
}

/// Current conditions for a city, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub description: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
}
