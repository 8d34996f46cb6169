//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The query/record data model
//! - The failure taxonomy of a lookup
//! - The `WeatherLookup` component and its OpenWeatherMap implementation
//! - Configuration & credential resolution
//!
//! Nothing in here prints; presentation belongs to the caller.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, PLACEHOLDER_API_KEY, is_usable_key, resolve_api_key};
pub use error::LookupError;
pub use model::{Units, WeatherQuery, WeatherRecord};
pub use provider::{WeatherLookup, openweather::OpenWeatherProvider, provider_from_config};
