//! htmlql main entry point
//!
//! This is the command-line interface for the htmlql query server.

use anyhow::{Context, Result};
use clap::Parser;
use htmlql::config::{load_config, Config};
use htmlql::{Engine, EngineConfig, QueryOptions};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// htmlql: query HTML with GraphQL
///
/// Serves a GraphQL endpoint whose queries select into HTML documents and
/// follow links into the pages they reference.
#[derive(Parser, Debug)]
#[command(name = "htmlql")]
#[command(version)]
#[command(about = "Query HTML documents with GraphQL", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to bind to (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Maximum concurrent fetches per query (overrides the config file)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=1024))]
    concurrency: Option<u16>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the schema in SDL form and exit
    #[arg(long, conflicts_with = "query")]
    print_schema: bool,

    /// Run a single query from FILE (or `-` for stdin), print the JSON response and exit
    #[arg(long, value_name = "FILE")]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let engine = Engine::new(EngineConfig::from(&config)).context("Failed to build engine")?;

    if cli.print_schema {
        println!("{}", engine.sdl());
    } else if let Some(source) = &cli.query {
        handle_query(&engine, source).await?;
    } else {
        handle_serve(engine, &config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("htmlql=info,warn"),
            1 => EnvFilter::new("htmlql=debug,info"),
            2 => EnvFilter::new("htmlql=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(concurrency) = cli.concurrency {
        config.queue.concurrency = Some(usize::from(concurrency));
    }

    Ok(config)
}

/// Handles the --query mode: runs one query and prints the response JSON
async fn handle_query(engine: &Engine, source: &str) -> Result<()> {
    let text = if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read query from stdin")?;
        text
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read query from {}", source))?
    };

    let response = engine.execute(&text, QueryOptions::default()).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

/// Handles the default mode: serves the GraphQL endpoint
async fn handle_serve(engine: Engine, config: &Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(
        "Fetch concurrency per query: {}, user agent: {}",
        engine.concurrency(),
        config.fetch.user_agent
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    htmlql::server::serve(listener, Arc::new(engine))
        .await
        .context("Server error")?;

    Ok(())
}
