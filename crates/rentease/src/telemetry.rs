use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Driver crates whose connection chatter stays at `warn` unless `RUST_LOG` says otherwise.
const QUIET_DEPENDENCIES: [&str; 4] = ["mongodb=warn", "hyper=warn", "reqwest=warn", "rustls=warn"];

/// Installs the global subscriber. Output goes to stderr so it never interleaves with the
/// menus written to stdout.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(from_env.as_deref(), &config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

/// A valid `RUST_LOG` wins outright. Otherwise the configured level applies to the
/// marketplace and the store drivers are held back.
fn build_filter(from_env: Option<&str>, level: &str) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = from_env.and_then(|raw| EnvFilter::try_new(raw).ok()) {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(level).map_err(|source| TelemetryError::EnvFilter {
        value: level.to_string(),
        source,
    })?;
    for directive in QUIET_DEPENDENCIES {
        let directive = directive
            .parse()
            .map_err(|source| TelemetryError::EnvFilter {
                value: directive.to_string(),
                source,
            })?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}
