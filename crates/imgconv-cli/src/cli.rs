// crates/imgconv-cli/src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// imgconv - batch image format converter with optional resizing
#[derive(Parser)]
#[command(name = "imgconv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert images to another format
    Convert {
        /// Input files or glob patterns (e.g. ./photos/*.png)
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Target format (jpeg, png, bmp, tiff, webp, heic, gif). Defaults to the configured format
        #[arg(short = 'f', long)]
        format: Option<String>,

        /// Target width in pixels (0 = keep original)
        #[arg(short = 'W', long, default_value = "0")]
        width: u32,

        /// Target height in pixels (0 = keep original)
        #[arg(short = 'H', long, default_value = "0")]
        height: u32,

        /// Shrink one dimension to keep the source aspect ratio
        #[arg(short, long, overrides_with = "no_lock_aspect")]
        lock_aspect: bool,

        /// Stretch to the exact size even if the config locks the aspect ratio
        #[arg(long, overrides_with = "lock_aspect")]
        no_lock_aspect: bool,

        /// Output directory (default: next to each source)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JPEG/HEIC quality, 1-100
        #[arg(short, long)]
        quality: Option<u8>,

        /// Replace existing output files even if the config forbids it
        #[arg(long, overrides_with = "no_overwrite")]
        overwrite: bool,

        /// Fail instead of replacing existing output files
        #[arg(long, overrides_with = "overwrite")]
        no_overwrite: bool,
    },

    /// List supported output formats
    Formats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Reset to defaults
    Reset,

    /// Show config file path
    Path,
}
