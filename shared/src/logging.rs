//! Log and error reporting setup shared by the binaries.
//!
//! Logs are written to stderr through `tracing-subscriber`, filtered with
//! `RUST_LOG` (default `info`). When a Sentry DSN is configured, warnings and
//! errors are additionally forwarded to Sentry through its tracing layer.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "info";

/// Keeps the Sentry client alive. Dropping it flushes pending events.
pub struct LoggingGuard {
    _sentry: Option<sentry::ClientInitGuard>,
}

pub fn init(sentry_dsn: Option<&str>) -> LoggingGuard {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let sentry_guard = sentry_dsn.map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });
    let sentry_layer = sentry_guard
        .as_ref()
        .map(|_| sentry::integrations::tracing::layer());

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_layer)
        .try_init();

    if let Err(e) = result {
        eprintln!("Logging already initialized: {e}");
    }

    LoggingGuard {
        _sentry: sentry_guard,
    }
}
