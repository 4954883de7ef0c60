//! Subscriber setup for the replay binary.

use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_subscriber::{
    layer::SubscriberExt as _, registry::LookupSpan, util::SubscriberInitExt as _, EnvFilter,
    Layer,
};

/// Output format, picked with `RUST_LOG_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// `json` selects JSON lines; anything else is pretty.
    pub fn from_mode(mode: &str) -> Self {
        match mode {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }

    pub fn layer<S>(self) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        for<'a> S: Subscriber + LookupSpan<'a>,
    {
        // Decisions go to stderr so stdout stays machine-readable
        let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        match self {
            Self::Json => Box::new(fmt.json().with_target(false)),
            Self::Pretty => Box::new(fmt.pretty().with_target(true)),
        }
    }
}

/// Install the global subscriber: `RUST_LOG` filter (default `info`) plus
/// the format chosen by `RUST_LOG_MODE`.
///
/// An unparsable `RUST_LOG` falls back to the default level. Calling this
/// twice is a no-op.
pub fn init_tracing() {
    let format = std::env::var("RUST_LOG_MODE")
        .map(|mode| LogFormat::from_mode(&mode))
        .unwrap_or(LogFormat::Pretty);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(format.layer())
        .try_init();
}
