//! tunesona-analyzer - command-line entry point
//!
//! Runs one library analysis (or the demo analysis) and prints the report to
//! stdout. Diagnostics go to stderr through tracing.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tunesona_analyzer::client::HttpQueryClient;
use tunesona_analyzer::config::resolve_credential_provider;
use tunesona_analyzer::demo::demo_snapshot;
use tunesona_analyzer::{AnalysisReport, LibraryAggregator, LibraryPipeline, PipelineError};
use tunesona_common::config::{ConfigResolver, TomlConfig};
use tunesona_common::credential::TokenStore;
use tunesona_common::{Clock, Credential, SystemClock};

/// Command-line arguments for tunesona-analyzer
#[derive(Parser, Debug)]
#[command(name = "tunesona-analyzer")]
#[command(about = "Music library analysis and persona classification")]
#[command(version)]
struct Args {
    /// Config file (overrides TUNESONA_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the library and print the analysis
    Analyze {
        /// User token (highest priority credential source)
        #[arg(long)]
        token: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Append the analysis prompt
        #[arg(long)]
        prompt: bool,
    },

    /// Analyze the built-in demo library
    Demo {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Append the analysis prompt
        #[arg(long)]
        prompt: bool,
    },

    /// Manage the local token store
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand, Debug)]
enum TokenAction {
    /// Save a user token
    Store {
        token: String,

        /// Seconds until the token expires
        #[arg(long)]
        expires_in: Option<i64>,
    },

    /// Delete the stored token
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis_prompt: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = ConfigResolver::new(args.config.clone());
    let config = load_config(&resolver, std::io::stderr).context("Failed to load configuration")?;

    init_tracing(&config);

    info!(
        "Starting tunesona-analyzer v{}",
        env!("CARGO_PKG_VERSION")
    );

    match args.command {
        Command::Analyze {
            token,
            format,
            prompt,
        } => {
            let report = run_analysis(&config, token.as_deref()).await?;
            print_report(&report, format, prompt)?;
        }
        Command::Demo { format, prompt } => {
            info!("Analyzing demo library");
            let report = AnalysisReport::from_snapshot(demo_snapshot());
            print_report(&report, format, prompt)?;
        }
        Command::Token { action } => {
            let store = TokenStore::new(config.token_store_path());
            match action {
                TokenAction::Store { token, expires_in } => {
                    let credential = match expires_in {
                        Some(secs) => Credential::expiring_in(token, SystemClock.now(), secs),
                        None => Credential::new(token),
                    };
                    store
                        .store(&credential)
                        .await
                        .context("Failed to store user token")?;
                    println!("Token stored at {}", store.path().display());
                }
                TokenAction::Clear => {
                    store.clear().await.context("Failed to clear token store")?;
                    println!("Token store cleared");
                }
            }
        }
    }

    Ok(())
}

/// Load the config under a scoped bootstrap subscriber
///
/// The configured log level is not known yet, so config loading logs with
/// `RUST_LOG` or info until `init_tracing` installs the global subscriber.
fn load_config<W>(resolver: &ConfigResolver, writer: W) -> Result<TomlConfig>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish();

    let config = tracing::subscriber::with_default(bootstrap, || resolver.load())?;
    Ok(config)
}

/// `RUST_LOG` wins, then `[logging] level`, then info
fn init_tracing(config: &TomlConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_analysis(config: &TomlConfig, cli_token: Option<&str>) -> Result<AnalysisReport> {
    let provider = resolve_credential_provider(cli_token, config)
        .await
        .context("Failed to resolve user token")?;

    let client = HttpQueryClient::new(&config.api).context("Failed to create HTTP client")?;
    info!("Music API: {}", client.base_url());

    let aggregator = LibraryAggregator::standard(Arc::new(client), &config.query, &SystemClock);
    let pipeline = LibraryPipeline::new(aggregator, provider);

    match pipeline.analyze().await {
        Ok(report) => {
            for failure in &report.snapshot.failed_sources {
                warn!(
                    collection = %failure.collection,
                    "Source unavailable, analysis is partial: {}",
                    failure.error
                );
            }
            Ok(report)
        }
        Err(PipelineError::AllSourcesFailed { failures }) => {
            for failure in &failures {
                error!(collection = %failure.collection, "{}", failure.error);
            }
            Err(PipelineError::AllSourcesFailed { failures }).context("Library analysis failed")
        }
        Err(e) => Err(e).context("Library analysis failed"),
    }
}

fn print_report(report: &AnalysisReport, format: OutputFormat, with_prompt: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = JsonReport {
                report,
                analysis_prompt: with_prompt.then(|| report.analysis_prompt()),
            };
            let json = serde_json::to_string_pretty(&output).context("Failed to encode report")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("{}", report.render_text());
            if with_prompt {
                println!();
                println!("{}", report.analysis_prompt());
            }
        }
    }
    Ok(())
}
