//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Upload a spreadsheet and draw one first-column value per workday
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "workday-draw", version, about)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// TCP port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory for in-flight uploads
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}
