//! jstyle CLI tool.
//!
//! Usage:
//! ```bash
//! jstyle check -c jstyle.toml src/Main.java
//! jstyle tree src/Main.java
//! jstyle query src/Main.java --xpath "/COMPILATION_UNIT/CLASS_DEF"
//! jstyle suppress -c jstyle.toml src/Main.java --location 14:5
//! jstyle list-checks
//! ```
//!
//! Exit status: the audit exits with the error-severity violation count;
//! configuration and I/O failures exit with the distinct code 255.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Static analysis for Java sources with pluggable checks
#[derive(Parser)]
#[command(name = "jstyle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured checks over the given files
    Check {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Files to audit
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the syntax tree of a file
    Tree {
        /// File to parse
        file: PathBuf,

        /// Include comment nodes
        #[arg(long)]
        comments: bool,

        /// Additionally reparse javadoc comment bodies
        #[arg(long)]
        javadoc: bool,
    },

    /// Print the javadoc mini-tree of a comment-body file
    Javadoc {
        /// File holding a javadoc comment body
        file: PathBuf,
    },

    /// Print subtrees matching a path query
    Query {
        /// File to parse
        file: PathBuf,

        /// Path query, e.g. /COMPILATION_UNIT/CLASS_DEF[./IDENT[@text='A']]
        #[arg(short = 'x', long)]
        xpath: String,
    },

    /// Generate suppression XML for a position in an audited file
    Suppress {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// File to audit
        file: PathBuf,

        /// Position as LINE or LINE:COLUMN
        #[arg(short, long)]
        location: String,
    },

    /// List available checks
    ListChecks,
}

/// Output format for audit results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Standard audit text output.
    #[default]
    Text,
    /// JSON array of violations.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

/// Exit code for configuration and I/O failures, distinct from any
/// violation count.
const EXIT_FAILURE: i32 = 255;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Check {
            config,
            files,
            format,
            output,
        } => commands::check::run(&config, &files, format, output.as_deref()),
        Commands::Tree {
            file,
            comments,
            javadoc,
        } => commands::tree::run(&file, comments, javadoc),
        Commands::Javadoc { file } => commands::tree::run_javadoc(&file),
        Commands::Query { file, xpath } => commands::query::run(&file, &xpath),
        Commands::Suppress {
            config,
            file,
            location,
        } => commands::suppress::run(&config, &file, &location),
        Commands::ListChecks => {
            commands::list_checks::run();
            Ok(0)
        }
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
