use thiserror::Error;

/// Why a lookup produced no [`WeatherRecord`](crate::WeatherRecord).
///
/// The `Display` text of each variant is what the CLI shows the user.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("Connection error occurred: {0}")]
    Connection(String),

    #[error("Timeout error occurred: {0}")]
    Timeout(String),

    #[error("HTTP error occurred: {status}")]
    Http { status: reqwest::StatusCode },

    #[error("Error: City not found.")]
    NotFound,

    #[error("Could not parse weather data. JSON structure may have changed: {0}")]
    MalformedResponse(String),

    /// Any other transport failure (bad URL, interrupted body, ...).
    #[error("An error occurred: {0}")]
    Request(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries `appid`, so it never reaches the message.
        let connect = err.is_connect();
        let timeout = err.is_timeout();
        let detail = err.without_url().to_string();

        // A connect timeout is reported as a connection failure.
        if connect {
            LookupError::Connection(detail)
        } else if timeout {
            LookupError::Timeout(detail)
        } else {
            LookupError::Request(detail)
        }
    }
}
