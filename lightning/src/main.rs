use clap::{Parser, Subcommand};
use index_server::config::Config as ServerConfig;
use resolver::errors::StoreError;
use resolver::{IndexError, IndexResolver, get_store};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod config;
mod telemetry;

// Exit code of `resolve` when the site itself is down
const EXIT_SITE_DOWN: u8 = 2;

#[derive(Parser)]
#[command(
    name = "lightning",
    about = "Serves pre-rendered index documents from a key-value store"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Run the index server
    Run {
        #[arg(long)]
        config: PathBuf,
    },
    /// Resolve the index document once and print it to stdout
    Resolve {
        #[arg(long)]
        config: PathBuf,
        /// Explicit revision to resolve instead of the current one
        #[arg(long)]
        revision: Option<String>,
    },
}

impl CliCommand {
    fn config_path(&self) -> &Path {
        match self {
            CliCommand::Run { config } => config,
            CliCommand::Resolve { config, .. } => config,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::Config::from_file(cli.command.config_path()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry = telemetry::init_logging(config.common.logging.as_ref());

    if let Some(metrics_config) = &config.common.metrics
        && let Err(e) = telemetry::init_metrics(metrics_config)
    {
        tracing::warn!(error = %e, "Failed to initialize metrics");
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        CliCommand::Run { .. } => match rt.block_on(index_server::run(config.server)) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Index server exited");
                ExitCode::FAILURE
            }
        },
        CliCommand::Resolve { revision, .. } => {
            match rt.block_on(resolve_once(config.server, revision)) {
                Ok(html) => {
                    println!("{html}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{e}");
                    e.exit_code()
                }
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum ResolveOnceError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl ResolveOnceError {
    fn exit_code(&self) -> ExitCode {
        match self {
            ResolveOnceError::Index(e) if e.is_critical() => ExitCode::from(EXIT_SITE_DOWN),
            _ => ExitCode::FAILURE,
        }
    }
}

async fn resolve_once(
    config: ServerConfig,
    revision: Option<String>,
) -> Result<String, ResolveOnceError> {
    let store = get_store(config.store).await?;
    let resolver = IndexResolver::new(store, config.resolver);

    let mut query = HashMap::new();
    if let Some(revision) = revision {
        query.insert(resolver.options().revision_query_param.clone(), revision);
    }

    Ok(resolver.resolve(&config.app_name, &query).await?)
}
