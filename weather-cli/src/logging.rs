use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so the weather block on stdout stays clean.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown unless
/// `--verbose` was passed.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize tracing subscriber: {e}"))
}
