use clap::{Parser, Subcommand};
use config::{Config, ConfigError, MetricsConfig};
use metrics_exporter_statsd::{StatsdBuilder, StatsdError};
use resolver::{FlightCode, FlightResolver, IdentifierError, ResolverError};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

mod config;

const METRICS_PREFIX: &str = "flightinfo";

#[derive(Parser)]
#[command(name = "flightinfo", version, about = "Look up flights and airports")]
struct Cli {
    /// Path to a YAML config file. Without one, public provider endpoints are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Resolve a flight identifier such as BA117 or UAL123
    Flight { identifier: String },
    /// Look up an airport by IATA or ICAO code
    Airport { code: String },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resolver(#[from] ResolverError),
    #[error("invalid flight identifier: {0}")]
    Identifier(#[from] IdentifierError),
    #[error("airport code is empty")]
    EmptyAirportCode,
    #[error("could not set up metrics: {0}")]
    Metrics(#[from] StatsdError),
    #[error("a metrics recorder is already installed")]
    MetricsRecorder,
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("could not serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let _logging = shared::logging::init(config.logging.sentry_dsn.as_deref());

    if let Some(metrics) = &config.metrics {
        install_metrics(metrics)?;
    }

    match cli.command {
        CliCommand::Flight { identifier } => {
            let code = FlightCode::parse(&identifier)?;
            let resolver = FlightResolver::from_config(&config.resolver)?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let record = runtime.block_on(resolver.resolve_flight(&code));
            print_json(&record)
        }
        CliCommand::Airport { code } => {
            if code.trim().is_empty() {
                return Err(CliError::EmptyAirportCode);
            }
            let resolver = FlightResolver::new();
            print_json(&resolver.resolve_airport(&code))
        }
    }
}

fn install_metrics(config: &MetricsConfig) -> Result<(), CliError> {
    let recorder = StatsdBuilder::from(config.statsd_host.as_str(), config.statsd_port)
        .build(Some(METRICS_PREFIX))?;
    metrics::set_global_recorder(recorder).map_err(|_| CliError::MetricsRecorder)?;

    shared::metrics_defs::describe(resolver::metrics_defs::ALL_METRICS);
    tracing::debug!(
        host = %config.statsd_host,
        port = config.statsd_port,
        "Installed statsd metrics exporter"
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
