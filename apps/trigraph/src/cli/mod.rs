//! # Trigraph CLI Module
//!
//! This module implements the CLI interface for Trigraph.
//!
//! ## Available Commands
//!
//! - `status` - Show database status
//! - `assert` - Assert a (subject, predicate, object) triple
//! - `query` - Query the triple layer
//! - `gen` - Generate a canonical graph shape into the database
//! - `export` - Export the database to a file
//! - `import` - Import a file into the database
//! - `hash` - Compute the BLAKE3 content fingerprint of the database

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;
use trigraph_core::TrigraphError;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Trigraph - content-addressed triple-graph engine
///
/// Every node and edge is identified by a BLAKE3 digest of its content;
/// triples are indexed for direct lookup in both query directions.
#[derive(Parser, Debug)]
#[command(name = "trigraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the graph database (overrides the config file)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "trigraph.toml")]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// The CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show database status
    Status,

    /// Assert a (subject, predicate, object) triple
    Assert {
        /// The subject value
        #[arg(short, long)]
        subject: String,

        /// The predicate value
        #[arg(short, long)]
        predicate: String,

        /// The object value
        #[arg(short, long)]
        object: String,
    },

    /// Query the triple layer
    Query {
        /// The predicate to query (always required: predicates cannot be
        /// searched as wildcards)
        #[arg(short, long)]
        predicate: String,

        /// Concrete subject (omit for a wildcard)
        #[arg(short, long)]
        subject: Option<String>,

        /// Concrete object (omit for a wildcard)
        #[arg(short, long)]
        object: Option<String>,

        /// Filter returned values by this part
        #[arg(short = 'm', long = "match")]
        match_part: Option<String>,

        /// Where the part must match: prefix, suffix, substring or exact
        #[arg(short = 'w', long = "where", default_value = "substring")]
        where_mode: String,
    },

    /// Generate a canonical graph shape into the database
    Gen {
        /// Shape: line, star, polygon, complete or ladder
        #[arg(short = 'S', long)]
        shape: String,

        /// Size of the shape (nodes, spokes or ladder height)
        #[arg(short = 'n', long)]
        size: usize,
    },

    /// Export the database to a file
    Export {
        /// Path of the output file
        #[arg(short, long)]
        file: PathBuf,

        /// Output format (bin, cbor, csv)
        #[arg(short = 't', long, default_value = "bin")]
        format: String,
    },

    /// Import a file into the database
    Import {
        /// Path of the input file
        #[arg(short, long)]
        file: PathBuf,

        /// Input format (bin, cbor, csv)
        #[arg(short = 't', long, default_value = "bin")]
        format: String,
    },

    /// Compute the BLAKE3 content fingerprint of the database
    Hash,
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Execute the parsed CLI command.
pub fn execute(cli: Cli, config: &AppConfig) -> Result<(), TrigraphError> {
    let db_path = config.database_path(cli.database.as_deref());

    match cli.command {
        Commands::Status => commands::cmd_status(&db_path, cli.json_mode),
        Commands::Assert {
            subject,
            predicate,
            object,
        } => commands::cmd_assert(&db_path, &subject, &predicate, &object),
        Commands::Query {
            predicate,
            subject,
            object,
            match_part,
            where_mode,
        } => commands::cmd_query(
            &db_path,
            cli.json_mode,
            &predicate,
            subject.as_deref(),
            object.as_deref(),
            match_part.as_deref(),
            &where_mode,
        ),
        Commands::Gen { shape, size } => commands::cmd_gen(&db_path, &shape, size),
        Commands::Export { file, format } => commands::cmd_export(&db_path, &file, &format),
        Commands::Import { file, format } => commands::cmd_import(&db_path, &file, &format),
        Commands::Hash => commands::cmd_hash(&db_path, cli.json_mode),
    }
}
