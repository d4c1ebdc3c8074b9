use std::rc::Rc;

use serde::Deserialize;

use crate::color::Color;

/// One dominant color and its relative frequency weight.
///
/// The hex form is always derived from `color`, so the two views cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "WireSwatch")]
pub struct Swatch {
    pub color: Color,
    pub count: u64,
}

impl Swatch {
    pub fn new(color: Color, count: u64) -> Self {
        Self { color, count }
    }

    /// Lowercase `#rrggbb`, the form written into exports.
    pub fn hex(&self) -> String {
        self.color.to_hex()
    }
}

/// A color record as the extraction service sends it.
#[derive(Debug, Deserialize)]
struct WireSwatch {
    hex: String,
    rgb: Color,
    count: u64,
}

impl TryFrom<WireSwatch> for Swatch {
    type Error = String;

    fn try_from(wire: WireSwatch) -> Result<Self, Self::Error> {
        let parsed = Color::from_hex(&wire.hex).map_err(|e| e.to_string())?;
        if parsed != wire.rgb {
            return Err(format!(
                "hex {} does not match rgb({}, {}, {})",
                wire.hex, wire.rgb.r, wire.rgb.g, wire.rgb.b
            ));
        }
        Ok(Swatch::new(wire.rgb, wire.count))
    }
}

/// Ordered, dominance-ranked list of colors for one image.
///
/// A palette is never edited after construction; a new extraction produces a
/// new palette. The total weight is summed once here. Percentages are derived
/// on demand and only rounded by the callers that render or export them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "WirePalette")]
pub struct Palette {
    swatches: Vec<Swatch>,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct WirePalette {
    colors: Vec<Swatch>,
}

impl From<WirePalette> for Palette {
    fn from(wire: WirePalette) -> Self {
        Palette::new(wire.colors)
    }
}

impl Palette {
    pub fn new(swatches: Vec<Swatch>) -> Self {
        // Saturates instead of overflowing on absurd service weights.
        let total = swatches
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.count));
        Self { swatches, total }
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Swatch> {
        self.swatches.iter()
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Swatch> {
        self.swatches.get(index)
    }

    /// Sum of all frequency weights.
    pub fn total_count(&self) -> u64 {
        self.total
    }

    /// Unrounded share of `swatch` in the whole palette, in [0, 100].
    ///
    /// A palette whose weights sum to zero reports 0 for every entry.
    pub fn percentage(&self, swatch: &Swatch) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        swatch.count as f64 / self.total as f64 * 100.0
    }

    /// Percentage rounded half-up to a whole number, for display and export.
    pub fn rounded_percentage(&self, swatch: &Swatch) -> u32 {
        self.percentage(swatch).round() as u32
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Swatch;
    type IntoIter = std::slice::Iter<'a, Swatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.swatches.iter()
    }
}

/// Holds the palette currently on display.
///
/// Readers take a cheap shared snapshot; the upload controller is the only
/// writer and always swaps the whole value.
#[derive(Debug, Default)]
pub struct PaletteModel {
    current: Rc<Palette>,
}

impl PaletteModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The palette as of now. Later replacements do not affect it.
    pub fn snapshot(&self) -> Rc<Palette> {
        Rc::clone(&self.current)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Swap in a freshly extracted palette and return the shared handle.
    pub fn replace(&mut self, palette: Palette) -> Rc<Palette> {
        self.current = Rc::new(palette);
        self.snapshot()
    }

    pub fn clear(&mut self) {
        if !self.current.is_empty() {
            self.current = Rc::new(Palette::default());
        }
    }
}
