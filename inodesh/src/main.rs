//! # Inode Shell
//!
//! Main entry point: `inodesh [OPTIONS] [ROOT_DIR]`.

use clap::Parser;
use inodesh::{ConfigError, Session, ShellConfig};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Shell over an emulated inode namespace.
#[derive(Parser)]
#[command(name = "inodesh")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the backing store and sidecar files
    root_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backing store file name inside the root directory
    #[arg(long)]
    store: Option<String>,

    /// Keep placeholders in memory instead of writing sidecar files
    #[arg(long)]
    no_sidecars: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = build_config(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let mut session = Session::open(&config).unwrap_or_else(|e| {
        eprintln!("Failed to open namespace: {}", e);
        process::exit(1);
    });

    if let Err(e) = session.run(io::stdin().lock(), io::stdout()) {
        eprintln!("Session error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr so they never mix with command output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {}", e);
    }
}

fn build_config(cli: &Cli) -> Result<ShellConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => ShellConfig::from_json_file(path)?,
        None => ShellConfig::default(),
    };

    if let Some(root_dir) = &cli.root_dir {
        config.root_dir = root_dir.clone();
    }
    if let Some(store) = &cli.store {
        config.store_name = store.clone();
    }
    if cli.no_sidecars {
        config.sidecars = false;
    }

    Ok(config)
}
