use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::color::Color as AppColor;
use crate::model::{Palette, Swatch};

const BAR_WIDTH: usize = 10;

/// A widget that lists every swatch of the palette on its own row: a color
/// block, the uppercase hex code, `rgb()` and `hsl()` strings, and a
/// percentage bar. Highlights the selected row and marks the copied one.
pub struct PaletteWidget<'a> {
    palette: &'a Palette,
    selected: Option<usize>,
    copied: Option<usize>,
}

impl<'a> PaletteWidget<'a> {
    pub fn new(palette: &'a Palette, selected: Option<usize>, copied: Option<usize>) -> Self {
        Self {
            palette,
            selected,
            copied,
        }
    }
}

fn to_color(c: AppColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: AppColor) -> Color {
    if c.relative_luminance() > 0.4 {
        Color::Black
    } else {
        Color::White
    }
}

/// Fixed-width bar such as `██████░░░░`.
pub(crate) fn percentage_bar(percentage: f64) -> String {
    let filled = ((percentage / 100.0) * BAR_WIDTH as f64)
        .round()
        .clamp(0.0, BAR_WIDTH as f64) as usize;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

fn build_swatch_row(
    palette: &Palette,
    index: usize,
    swatch: &Swatch,
    selected: Option<usize>,
    copied: Option<usize>,
) -> Line<'static> {
    let c = swatch.color;
    let is_selected = selected == Some(index);

    let marker = if is_selected { "▸ " } else { "  " };
    let mut hex_style = Style::default().add_modifier(Modifier::BOLD);
    if is_selected {
        hex_style = hex_style.add_modifier(Modifier::UNDERLINED);
    }

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(
            format!("{:^4}", index + 1),
            Style::default().bg(to_color(c)).fg(contrast_fg(c)),
        ),
        Span::styled("   ", Style::default().bg(to_color(c))),
        Span::raw(" "),
        Span::styled(c.to_hex_upper(), hex_style),
        Span::raw(format!("  {:<18} {:<20} ", c.to_rgb_string(), c.to_hsl_string())),
        Span::styled(
            percentage_bar(palette.percentage(swatch)),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(format!(" {:>3}%", palette.rounded_percentage(swatch))),
    ];

    if copied == Some(index) {
        spans.push(Span::styled(
            "  ✓ copied",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

/// First row to draw so the selected row stays visible.
fn scroll_offset(selected: Option<usize>, visible: usize) -> usize {
    match selected {
        Some(sel) if visible > 0 && sel >= visible => sel + 1 - visible,
        _ => 0,
    }
}

impl Widget for PaletteWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.palette.is_empty() {
            return;
        }

        let block = Block::bordered()
            .title(" Extracted Palette ")
            .title_bottom(Line::from(format!(" {} colors ", self.palette.len())).right_aligned());
        let inner = block.inner(area);
        block.render(area, buf);

        let offset = scroll_offset(self.selected, inner.height as usize);
        let lines: Vec<Line> = self
            .palette
            .iter()
            .enumerate()
            .skip(offset)
            .take(inner.height as usize)
            .map(|(i, swatch)| build_swatch_row(self.palette, i, swatch, self.selected, self.copied))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
