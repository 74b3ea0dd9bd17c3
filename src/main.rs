//! canary-router command line.
//!
//! Validates routing configuration files and evaluates sample requests
//! against them without a running gateway.

use std::path::PathBuf;

use axum::http::Request;
use clap::{Parser, Subcommand};
use serde::Serialize;

use canary_router::config::load_config;
use canary_router::observability::init_logging;

#[derive(Parser)]
#[command(name = "canary-router")]
#[command(about = "Check and evaluate canary routing rules", long_about = None)]
struct Cli {
    /// Routing configuration file (TOML).
    #[arg(short, long, default_value = "routing.toml")]
    config: PathBuf,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every routing in the configuration
    Check,
    /// Evaluate a request against the routing table
    Eval {
        /// Request path.
        #[arg(long, default_value = "/")]
        path: String,

        /// Request header as name=value (repeatable).
        #[arg(short = 'H', long = "header", value_parser = parse_pair)]
        headers: Vec<(String, String)>,

        /// Cookie as name=value (repeatable).
        #[arg(short = 'C', long = "cookie", value_parser = parse_pair)]
        cookies: Vec<(String, String)>,

        /// Raw query string, e.g. "uid=7&group=beta".
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[derive(Serialize)]
struct CheckReport {
    valid: bool,
    routings: usize,
}

#[derive(Serialize)]
struct Decision {
    matched: bool,
    cluster: Option<String>,
    description: Option<String>,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got `{s}`"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging(&config.logging);

    let table = match config.build_table() {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(path = %cli.config.display(), "Invalid routing configuration");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    tracing::debug!(routings = table.len(), "Routing table built");

    match cli.command {
        Commands::Check => {
            let report = CheckReport {
                valid: true,
                routings: table.len(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Eval {
            path,
            headers,
            cookies,
            query,
        } => {
            let uri = match query {
                Some(q) => format!("{path}?{q}"),
                None => path,
            };
            let mut builder = Request::builder().uri(uri);
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if !cookies.is_empty() {
                let cookie = cookies
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                builder = builder.header("cookie", cookie);
            }
            let request = builder.body(())?;

            let routing = table.select(&request);
            let decision = Decision {
                matched: routing.is_some(),
                cluster: routing.map(|r| r.cluster().to_string()),
                description: routing.map(|r| r.description().to_string()),
            };
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
    }

    Ok(())
}
