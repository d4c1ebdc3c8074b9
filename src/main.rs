use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use crossterm::style::{Color as TermColor, Stylize};

use chromapick::backends::{export, DirectorySink, FileSink};
use chromapick::cli::Args;
use chromapick::clipboard::{ClipboardService, SystemClipboard};
use chromapick::config::Config;
use chromapick::logging;
use chromapick::model::Palette;
use chromapick::pipeline::extract::HttpExtractionClient;
use chromapick::pipeline::upload::{UploadController, UploadState};
use chromapick::pipeline::validate::ImageFile;
use chromapick::tui::{self, TuiApp};

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.tui);
    let config = Config::from_args(&args)?;
    let client = HttpExtractionClient::new(&config.api_base);

    if args.health {
        let health = client.health()?;
        println!("{}: {} ({})", client.base_url(), health.status, health.service);
        return Ok(());
    }

    let Some(path) = args.image.as_deref() else {
        bail!("no image given");
    };

    if args.tui {
        let output_dir = config
            .output_dir
            .clone()
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        let app = TuiApp::new(
            path,
            Arc::new(client),
            Box::new(SystemClipboard),
            Box::new(DirectorySink::new(output_dir)),
            config.format,
        );
        return tui::run(app);
    }

    let file = ImageFile::open(path)?;
    let mut controller = UploadController::new();
    match controller.submit(&file, &client) {
        UploadState::Ready(_) => {}
        UploadState::Error(e) => bail!("{e}"),
        other => bail!("upload stopped while {}", other.name()),
    }
    let palette = controller.palette();

    if args.preview {
        print_preview(&palette);
    }
    if let Some(entry) = args.copy {
        copy_entry(&palette, entry);
    }

    let rendered = export(&palette, config.format);
    match &config.output_dir {
        Some(dir) => {
            let saved = DirectorySink::new(dir).save(&rendered)?;
            eprintln!(
                "wrote {} export to {}",
                config.format.backend().name(),
                saved.display()
            );
        }
        None => println!("{}", rendered.content),
    }

    Ok(())
}

/// Print each swatch with a colored block, its representations and share.
fn print_preview(palette: &Palette) {
    eprintln!("Extracted Palette ({} colors)", palette.len());
    for (i, swatch) in palette.iter().enumerate() {
        let c = swatch.color;
        let block = "      ".on(TermColor::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        });
        eprintln!(
            "{:>3}. {block} {}  {:<18} {:<20} {:>3}%",
            i + 1,
            c.to_hex_upper(),
            c.to_rgb_string(),
            c.to_hsl_string(),
            palette.rounded_percentage(swatch)
        );
    }
}

/// Copy the hex code of the 1-based `entry`. Failures only warn.
fn copy_entry(palette: &Palette, entry: NonZeroUsize) {
    let index = entry.get() - 1;
    let Some(swatch) = palette.get(index) else {
        eprintln!(
            "warning: --copy {entry} is out of range ({} colors)",
            palette.len()
        );
        return;
    };
    let mut clipboard = ClipboardService::new(SystemClipboard);
    if clipboard.copy(&swatch.hex(), index) {
        eprintln!("copied {} to clipboard", swatch.hex());
    }
}
