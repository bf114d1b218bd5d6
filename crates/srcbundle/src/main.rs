//! srcbundle - versioned source bundles with change tracking.
//!
//! This is the main entry point for the srcbundle CLI.

mod commands;

use clap::{Parser, Subcommand};
use commands::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "srcbundle")]
#[command(author, version, long_about = None)]
#[command(about = "Versioned source bundles with change tracking")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the bundle and record a snapshot for new versions
    Build {
        /// Project root (defaults to the nearest project above the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Bundle output file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Version label (defaults to package.json or Cargo.toml)
        #[arg(long)]
        version_label: Option<String>,
        /// Read the file list from a file instead of walking the project ("-" for stdin)
        #[arg(long)]
        files_from: Option<PathBuf>,
        /// Print the bundle to stdout instead of writing the output file
        #[arg(long)]
        stdout: bool,
        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },
    /// Show the changes the next build would report, without saving anything
    Status {
        /// Project root
        #[arg(long)]
        root: Option<PathBuf>,
        /// Version label (defaults to package.json or Cargo.toml)
        #[arg(long)]
        version_label: Option<String>,
    },
    /// Show the stored snapshot
    Snapshot {
        /// Project root
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Print the project tree
    Tree {
        /// Project root
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Show configuration
    Config {
        /// Project root
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Build {
            root,
            output,
            version_label,
            files_from,
            stdout,
            compact,
        } => {
            handle_build(
                &cwd,
                BuildOptions {
                    root,
                    output,
                    version_label,
                    files_from,
                    stdout,
                    compact,
                },
            )
            .await
        }
        Commands::Status {
            root,
            version_label,
        } => handle_status(&cwd, root, version_label).await,
        Commands::Snapshot { root } => handle_snapshot(&cwd, root).await,
        Commands::Tree { root } => handle_tree(&cwd, root).await,
        Commands::Config { root } => handle_config(&cwd, root).await,
    }
}
