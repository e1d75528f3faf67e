//! CLI binary for grafisearch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use grafisearch::{AppConfig, Server};
use grafisearch_scraper::{Aggregated, Provider};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Grafisearch: search Google, DuckDuckGo and YouTube without API keys.
#[derive(Parser)]
#[command(name = "grafisearch", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Run one search and print the merged results.
    Search {
        /// Search terms.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Provider to query (repeatable). Defaults to the configured list.
        #[arg(short, long = "provider", value_parser = parse_provider)]
        providers: Vec<Provider>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP server.
    Serve {
        /// Port to bind, overriding the config file.
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Queries are only ever logged at trace level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("grafisearch=info,grafisearch_scraper=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Search {
            query,
            providers,
            json,
        } => run_search(config, &query.join(" "), providers, json).await,
        Command::Serve { port } => run_serve(config, port).await,
    }
}

async fn run_search(
    mut config: AppConfig,
    query: &str,
    providers: Vec<Provider>,
    json: bool,
) -> anyhow::Result<()> {
    if !providers.is_empty() {
        config.search.providers = providers;
    }

    let aggregated = grafisearch_scraper::search(query, &config.search).await?;

    for failure in &aggregated.failures {
        eprintln!("warning: {} failed: {}", failure.provider, failure.error);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&aggregated)?);
    } else {
        print_results(&aggregated);
    }
    Ok(())
}

fn print_results(aggregated: &Aggregated) {
    if aggregated.results.is_empty() {
        println!("No results.");
        return;
    }
    for (i, result) in aggregated.results.iter().enumerate() {
        println!("{:>2}. {}", i + 1, result.title);
        println!("    {}  [{}]", result.url, result.site_name);
        if !result.desc.is_empty() {
            println!("    {}", result.desc);
        }
    }
}

async fn run_serve(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let server = Server::start(&config).await?;
    println!("Grafisearch v{} on http://{}", env!("CARGO_PKG_VERSION"), server.addr());

    tokio::select! {
        () = server.wait() => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("received Ctrl+C, shutting down...");
        }
    }
    Ok(())
}
