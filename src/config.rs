use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::backends::ExportFormat;
use crate::cli::Args;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Settings resolved once from the command line and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Service root; the extraction path is appended to it.
    pub api_base: String,
    pub format: ExportFormat,
    /// Where exports are saved. `None` prints them to stdout instead.
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            format: ExportFormat::default(),
            output_dir: None,
        }
    }
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        let api_base = args.api_url.trim().trim_end_matches('/').to_string();
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            bail!("API URL must start with http:// or https://, got {:?}", args.api_url);
        }
        Ok(Self {
            api_base,
            format: args.format,
            output_dir: args.output.clone(),
        })
    }
}
