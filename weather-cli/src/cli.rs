use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::io::{self, BufRead, Write};
use weather_core::{
    Config, WeatherLookup, WeatherQuery, is_usable_key, provider_from_config, resolve_api_key,
};

use crate::render::{self, MISSING_KEY_MESSAGE};

const CITY_PROMPT: &str = "Enter the city name to get its weather: ";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current weather for a city",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// City name; read from stdin when omitted.
    pub city: Option<String>,

    /// OpenWeatherMap API key, overrides the one in the config file.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Log request details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an OpenWeatherMap API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            None => {
                let config = config_for_lookup(self.api_key.as_deref(), Config::load())?;
                let api_key = resolve_api_key(self.api_key.as_deref(), &config);
                let provider = provider_from_config(&config)?;

                let stdin = io::stdin();
                let stdout = io::stdout();
                show_weather(&provider, api_key, self.city, stdin.lock(), stdout.lock()).await
            }
        }
    }
}

/// An unreadable config file only matters when it is the sole source of the key.
fn config_for_lookup(
    explicit_key: Option<&str>,
    loaded: anyhow::Result<Config>,
) -> anyhow::Result<Config> {
    match loaded {
        Ok(config) => Ok(config),
        Err(err) if explicit_key.is_some_and(is_usable_key) => {
            let detail = format!("{err:#}");
            tracing::warn!(error = %detail, "ignoring unreadable config file");
            Ok(Config::default())
        }
        Err(err) => Err(err),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Sign up at https://openweathermap.org/api to get one")
        .prompt()
        .context("Failed to read API key")?;

    let key = key.trim();
    if !is_usable_key(key) {
        println!("That is not a usable API key; nothing was saved.");
        return Ok(());
    }

    config.set_api_key(key.to_string());
    let path = config.save()?;
    tracing::info!(path = %path.display(), "saved API key");
    println!("API key saved to {}", path.display());

    Ok(())
}

/// One lookup round trip: resolve the city, query, print the outcome.
///
/// Lookup failures are printed, never returned; only console I/O errors are.
pub async fn show_weather<R: BufRead, W: Write>(
    lookup: &dyn WeatherLookup,
    api_key: Option<String>,
    city: Option<String>,
    mut input: R,
    mut out: W,
) -> anyhow::Result<()> {
    let Some(api_key) = api_key else {
        writeln!(out, "{MISSING_KEY_MESSAGE}")?;
        return Ok(());
    };

    let city = match city {
        Some(city) => city,
        None => prompt_city(&mut input, &mut out)?,
    };

    let query = WeatherQuery::new(city, api_key);
    match lookup.lookup(&query).await {
        Ok(record) => write!(out, "{}", render::weather_block(&query.city, &record))?,
        Err(err) => writeln!(out, "{err}")?,
    }
    out.flush()?;

    Ok(())
}

fn prompt_city<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> anyhow::Result<String> {
    write!(out, "{CITY_PROMPT}")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read city name")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };
    use weather_core::{LookupError, WeatherRecord};

    #[derive(Debug)]
    struct StubLookup {
        outcome: Result<WeatherRecord, LookupError>,
        calls: AtomicUsize,
        last_query: Mutex<Option<WeatherQuery>>,
    }

    impl StubLookup {
        fn new(outcome: Result<WeatherRecord, LookupError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl WeatherLookup for StubLookup {
        async fn lookup(&self, query: &WeatherQuery) -> Result<WeatherRecord, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.clone());
            self.outcome.clone()
        }
    }

    fn london() -> WeatherRecord {
        WeatherRecord {
            description: "clear sky".into(),
            temperature_c: 15.0,
            humidity_pct: 60.0,
            wind_speed_mps: 3.1,
        }
    }

    async fn run_with(
        stub: &StubLookup,
        api_key: Option<&str>,
        city: Option<&str>,
        stdin: &str,
    ) -> String {
        let mut out = Vec::new();
        show_weather(
            stub,
            api_key.map(str::to_owned),
            city.map(str::to_owned),
            stdin.as_bytes(),
            &mut out,
        )
        .await
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn missing_key_skips_lookup_and_prints_instructions() {
        let stub = StubLookup::new(Ok(london()));

        let out = run_with(&stub, None, None, "London\n").await;

        assert_eq!(out, format!("{MISSING_KEY_MESSAGE}\n"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn prompts_for_city_and_prints_block() {
        let stub = StubLookup::new(Ok(london()));

        let out = run_with(&stub, Some("KEY"), None, "london\n").await;

        assert!(out.starts_with(CITY_PROMPT));
        assert!(out.contains("Weather for London:"));
        assert!(out.contains("Description: Clear Sky"));
        assert!(out.contains("Humidity:    60%"));
        assert!(out.contains("Wind Speed:  3.1 m/s"));

        let query = stub.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.city, "london");
        assert_eq!(query.api_key, "KEY");
    }

    #[tokio::test]
    async fn city_argument_skips_prompt() {
        let stub = StubLookup::new(Ok(london()));

        let out = run_with(&stub, Some("KEY"), Some("paris"), "").await;

        assert!(!out.contains(CITY_PROMPT));
        assert!(out.contains("Weather for Paris:"));
    }

    #[tokio::test]
    async fn failure_prints_message_and_still_succeeds() {
        let stub = StubLookup::new(Err(LookupError::NotFound));

        let out = run_with(&stub, Some("KEY"), Some("Atlantis"), "").await;

        assert_eq!(out, "Error: City not found.\n");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_input_is_forwarded() {
        let stub = StubLookup::new(Err(LookupError::NotFound));

        run_with(&stub, Some("KEY"), None, "").await;

        let query = stub.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.city, "");
    }

    #[test]
    fn broken_config_is_ignored_when_key_given() {
        let broken = || Err(anyhow::anyhow!("Failed to parse config file: config.toml"));

        let config = config_for_lookup(Some("KEY"), broken()).unwrap();
        assert_eq!(config, Config::default());

        assert!(config_for_lookup(None, broken()).is_err());
        assert!(config_for_lookup(Some(weather_core::PLACEHOLDER_API_KEY), broken()).is_err());
    }

    #[test]
    fn readable_config_is_kept() {
        let loaded = Config {
            timeout_secs: Some(7),
            ..Config::default()
        };

        let config = config_for_lookup(Some("KEY"), Ok(loaded.clone())).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn parses_city_and_key_flag() {
        let cli = Cli::try_parse_from(["weather", "--api-key", "KEY", "Berlin"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.city.as_deref(), Some("Berlin"));
        assert_eq!(cli.api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn parses_configure_subcommand() {
        let cli = Cli::try_parse_from(["weather", "configure"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure)));
    }
}
