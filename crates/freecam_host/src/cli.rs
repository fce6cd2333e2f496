// src/cli.rs
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "freecam_host",
    version,
    about = "Headless freecam host driven by a line script"
)]
pub struct Cli {
    /// Settings file (TOML). Missing file means defaults.
    #[arg(long, default_value = "freecam.toml")]
    pub config: PathBuf,

    /// Script to run. Reads stdin when omitted.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Print the effective settings and exit
    #[arg(long)]
    pub print_config: bool,

    /// Override the log directory from the settings file
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
