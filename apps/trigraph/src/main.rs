//! # Trigraph - Content-Addressed Triple-Graph Engine
//!
//! The main binary for the Trigraph engine.
//!
//! This application provides:
//! - CLI interface for graph and triple operations
//! - Import/export between the database and the core's codecs
//! - Content fingerprinting of stored graphs
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            apps/trigraph (THE BINARY)        │
//! │                                              │
//! │   ┌─────────────┐        ┌───────────────┐   │
//! │   │    CLI      │        │   File I/O    │   │
//! │   │   (clap)    │        │ (bin/cbor/csv)│   │
//! │   └──────┬──────┘        └───────┬───────┘   │
//! │          │                       │           │
//! │          └───────────┬───────────┘           │
//! │                      ▼                       │
//! │              ┌───────────────┐               │
//! │              │ trigraph-core │               │
//! │              │ (THE ENGINE)  │               │
//! │              └───────────────┘               │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Database status
//! trigraph status
//!
//! # Assert and query triples
//! trigraph assert -s RO -p official_name -o Romania
//! trigraph query -p official_name --match U --where prefix
//!
//! # Shapes, import/export, fingerprints
//! trigraph gen -S polygon -n 6
//! trigraph export -f countries.trig
//! trigraph hash
//! ```

mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();
    let config = config::AppConfig::load(&cli.config);

    // Initialize tracing — TRIGRAPH_LOG_FORMAT=json enables machine-parseable
    // output; the config file supplies the fallback.
    let log_format = std::env::var("TRIGRAPH_LOG_FORMAT")
        .ok()
        .or_else(|| config.log_format.clone())
        .unwrap_or_else(|| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trigraph=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli, &config) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Trigraph startup banner.
fn print_banner() {
    println!(
        "Trigraph v{} — content-addressed triple-graph engine",
        env!("CARGO_PKG_VERSION")
    );
    println!();
}
