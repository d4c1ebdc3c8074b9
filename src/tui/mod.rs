pub mod widgets;

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Tabs, Wrap};
use ratatui::DefaultTerminal;
use tracing::debug;

use crate::backends::{export, ExportFormat, FileSink};
use crate::clipboard::{ClipboardService, ClipboardSink};
use crate::model::Palette;
use crate::pipeline::extract::{ExtractionClient, ExtractionFailed};
use crate::pipeline::upload::{Completion, Submission, UploadController, UploadState};
use crate::pipeline::validate::{ImageFile, ValidationError};

use widgets::PaletteWidget;

const TICK: Duration = Duration::from_millis(100);

/// Extraction client that can be shared with request threads.
pub type SharedClient = Arc<dyn ExtractionClient + Send + Sync>;

type Response = (Submission, Result<Palette, ExtractionFailed>);

/// State for the interactive TUI application.
///
/// All state lives on the UI thread. Requests run on short-lived threads
/// that only send their answer back; the controller decides whether it is
/// still wanted.
pub struct TuiApp {
    pub controller: UploadController,
    pub format: ExportFormat,
    pub selected: usize,
    pub status: Option<String>,
    image_path: PathBuf,
    client: SharedClient,
    clipboard: ClipboardService<Box<dyn ClipboardSink>>,
    files: Box<dyn FileSink>,
    tx: Sender<Response>,
    rx: Receiver<Response>,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(
        image_path: &Path,
        client: SharedClient,
        clipboard: Box<dyn ClipboardSink>,
        files: Box<dyn FileSink>,
        format: ExportFormat,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            controller: UploadController::new(),
            format,
            selected: 0,
            status: None,
            image_path: image_path.to_path_buf(),
            client,
            clipboard: ClipboardService::new(clipboard),
            files,
            tx,
            rx,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Read the image again and send it off. A request still in flight is
    /// superseded.
    pub fn submit(&mut self) {
        self.status = None;
        self.selected = 0;
        self.clipboard.clear();

        let file = match ImageFile::open(&self.image_path) {
            Ok(file) => file,
            Err(e) => {
                match e.downcast_ref::<ValidationError>() {
                    Some(&reason) => self.controller.reject(reason),
                    None => {
                        self.controller.reset();
                        self.status = Some(format!("{e:#}"));
                    }
                }
                return;
            }
        };
        let Ok(submission) = self.controller.begin(&file) else {
            return;
        };

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = client.extract(&file);
            // The receiver is gone only when the app has exited.
            let _ = tx.send((submission, result));
        });
    }

    /// Apply every answer that has arrived since the last call.
    pub fn poll_responses(&mut self) {
        while let Ok((submission, result)) = self.rx.try_recv() {
            if self.controller.complete(submission, result) == Completion::Applied {
                self.selected = 0;
            } else {
                debug!(generation = submission.generation.0, "ignored stale response");
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.clipboard.tick(now);
    }

    pub fn copied(&self) -> Option<usize> {
        self.clipboard.copied()
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.controller.palette().len();
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Char('c') | KeyCode::Enter => self.copy_selected(),
            KeyCode::Char('f') | KeyCode::Tab => self.format = self.format.next(),
            KeyCode::Char('s') => self.save_export(),
            KeyCode::Char('u') => self.submit(),
            KeyCode::Char('x') => {
                self.controller.reset();
                self.clipboard.clear();
                self.selected = 0;
                self.status = None;
            }
            _ => {}
        }
    }

    fn copy_selected(&mut self) {
        let palette = self.controller.palette();
        if let Some(swatch) = palette.get(self.selected) {
            if self.clipboard.copy(&swatch.hex(), self.selected) {
                self.status = Some(format!("Copied {}", swatch.hex()));
            }
        }
    }

    fn save_export(&mut self) {
        let palette = self.controller.palette();
        if palette.is_empty() {
            self.status = Some("Nothing to export yet".to_string());
            return;
        }
        let rendered = export(&palette, self.format);
        self.status = Some(match self.files.save(&rendered) {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => format!("Save failed: {e:#}"),
        });
    }
}

/// Launch the TUI application.
pub fn run(mut app: TuiApp) -> Result<()> {
    let mut terminal = ratatui::try_init()?;
    app.submit();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut TuiApp) -> Result<()> {
    while !app.should_quit() {
        app.poll_responses();
        app.on_tick(Instant::now());
        terminal.draw(|frame| render(app, frame))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
    }
    Ok(())
}

fn header_lines(app: &TuiApp) -> Vec<Line<'static>> {
    let name = app
        .image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let preview = app
        .controller
        .preview()
        .map(|p| format!("  ({})", p.describe()))
        .unwrap_or_default();

    let state = match app.controller.state() {
        UploadState::Idle => Line::from("Press u to extract colors"),
        UploadState::Validating => Line::from("Checking image..."),
        UploadState::Uploading(_) => Line::styled(
            "Extracting colors... please wait while we analyze your image",
            Style::default().fg(Color::Magenta),
        ),
        UploadState::Ready(palette) => Line::from(format!("{} colors", palette.len())),
        UploadState::Error(e) => Line::styled(
            e.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    vec![Line::from(format!("{name}{preview}")), state]
}

fn render(app: &TuiApp, frame: &mut Frame) {
    let [header, body, formats, footer] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new(header_lines(app))
            .block(Block::bordered().title(" chromapick "))
            .wrap(Wrap { trim: true }),
        header,
    );

    let palette = app.controller.palette();
    frame.render_widget(
        PaletteWidget::new(&palette, Some(app.selected), app.copied()),
        body,
    );

    let selected_format = ExportFormat::ALL
        .iter()
        .position(|&f| f == app.format)
        .unwrap_or(0);
    frame.render_widget(
        Tabs::new(ExportFormat::ALL.iter().map(|f| f.label()))
            .select(selected_format)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Magenta))
            .block(Block::bordered().title(" Export Palette ")),
        formats,
    );

    let mut footer_lines = vec![Line::styled(
        "↑/↓ select  c copy hex  f format  s save  u re-extract  x reset  q quit",
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(status) = &app.status {
        footer_lines.push(Line::from(status.clone()));
    }
    frame.render_widget(Paragraph::new(footer_lines), footer);
}
