use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

use crate::backends::ExportFormat;
use crate::config::DEFAULT_API_BASE;

/// Extract a dominant color palette from an image and export it.
#[derive(Parser, Debug)]
#[command(name = "chromapick", version, about)]
pub struct Args {
    /// Path to the input image (PNG or JPEG, up to 10MB)
    #[arg(required_unless_present = "health")]
    pub image: Option<PathBuf>,

    /// Base URL of the color extraction service
    #[arg(long, env = "CHROMAPICK_API_URL", default_value = DEFAULT_API_BASE)]
    pub api_url: String,

    /// Export format
    #[arg(short, long, value_enum, default_value = "css")]
    pub format: ExportFormat,

    /// Save the export into this directory instead of printing it
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Print a colored swatch table to stderr
    #[arg(long)]
    pub preview: bool,

    /// Copy the hex code of entry N (1-based) to the clipboard
    #[arg(long, value_name = "N")]
    pub copy: Option<NonZeroUsize>,

    /// Launch interactive TUI mode
    #[arg(long, conflicts_with_all = ["output", "copy", "preview"])]
    pub tui: bool,

    /// Check that the extraction service is reachable and exit
    #[arg(long)]
    pub health: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
