pub mod css;
pub mod json;
pub mod tailwind;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::model::Palette;

/// MIME type every export is saved with.
pub const EXPORT_MIME: &str = "text/plain";

/// A text format a palette can be exported to.
pub trait ExportBackend {
    /// Human-readable name of the format.
    fn name(&self) -> &str;

    /// File name the export is saved under.
    fn filename(&self) -> &str;

    /// Render the palette. Pure; entries are numbered from 1 in display order.
    fn serialize(&self, palette: &Palette) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Css,
    Json,
    Tailwind,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Css,
        ExportFormat::Json,
        ExportFormat::Tailwind,
    ];

    pub fn backend(self) -> &'static dyn ExportBackend {
        match self {
            ExportFormat::Css => &css::CssBackend,
            ExportFormat::Json => &json::JsonBackend,
            ExportFormat::Tailwind => &tailwind::TailwindBackend,
        }
    }

    /// The format after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            ExportFormat::Css => ExportFormat::Json,
            ExportFormat::Json => ExportFormat::Tailwind,
            ExportFormat::Tailwind => ExportFormat::Css,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Css => "CSS",
            ExportFormat::Json => "JSON",
            ExportFormat::Tailwind => "TAILWIND",
        }
    }
}

/// Rendered export, ready to hand to a [`FileSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub content: String,
    pub mime_type: &'static str,
}

/// Render `palette` in `format`.
pub fn export(palette: &Palette, format: ExportFormat) -> Export {
    let backend = format.backend();
    Export {
        filename: backend.filename().to_string(),
        content: backend.serialize(palette),
        mime_type: EXPORT_MIME,
    }
}

/// Somewhere an export can be saved.
pub trait FileSink {
    /// Persist `export` and report where it went.
    fn save(&mut self, export: &Export) -> Result<PathBuf>;
}

/// Saves exports as files inside one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSink for DirectorySink {
    fn save(&mut self, export: &Export) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory: {}", self.dir.display())
        })?;
        let path = self.dir.join(&export.filename);
        std::fs::write(&path, &export.content)
            .with_context(|| format!("failed to write export to {}", path.display()))?;
        info!(path = %path.display(), bytes = export.content.len(), "saved export");
        Ok(path)
    }
}
