use crate::config::{LoggingConfig, MetricsConfig};
use metrics_exporter_statsd::StatsdBuilder;
use resolver::metrics_defs::ALL_METRICS;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const METRICS_PREFIX: &str = "lightning";

#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("statsd error: {0}")]
    Statsd(#[from] metrics_exporter_statsd::StatsdError),
    #[error("a metrics recorder is already installed")]
    RecorderAlreadySet,
}

/// Installs the global tracing subscriber. Events are also forwarded to
/// Sentry when a DSN is configured; the returned guard must be held for the
/// lifetime of the process.
pub fn init_logging(config: Option<&LoggingConfig>) -> Option<sentry::ClientInitGuard> {
    let guard = config.map(|logging| {
        sentry::init((
            logging.sentry_dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let sentry_layer = guard
        .as_ref()
        .map(|_| sentry::integrations::tracing::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(sentry_layer)
        .init();

    guard
}

pub fn init_metrics(config: &MetricsConfig) -> Result<(), TelemetryError> {
    let recorder = StatsdBuilder::from(config.statsd_host.as_str(), config.statsd_port)
        .build(Some(METRICS_PREFIX))?;

    metrics::set_global_recorder(recorder).map_err(|_| TelemetryError::RecorderAlreadySet)?;

    for def in ALL_METRICS {
        def.describe();
    }

    Ok(())
}
