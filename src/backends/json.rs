use serde::Serialize;

use crate::model::Palette;

use super::ExportBackend;

/// One exported color, in the field order the output is written.
#[derive(Debug, Serialize)]
struct JsonEntry {
    name: String,
    hex: String,
    rgb: String,
    hsl: String,
    percentage: u32,
}

/// Pretty-printed array with every representation of each color.
pub struct JsonBackend;

impl JsonBackend {
    fn entries(palette: &Palette) -> Vec<JsonEntry> {
        palette
            .iter()
            .enumerate()
            .map(|(i, swatch)| JsonEntry {
                name: format!("color-{}", i + 1),
                hex: swatch.hex(),
                rgb: swatch.color.to_rgb_string(),
                hsl: swatch.color.to_hsl_string(),
                percentage: palette.rounded_percentage(swatch),
            })
            .collect()
    }
}

impl ExportBackend for JsonBackend {
    fn name(&self) -> &str {
        "JSON"
    }

    fn filename(&self) -> &str {
        "palette.json"
    }

    fn serialize(&self, palette: &Palette) -> String {
        // Serializing a Vec of plain string/integer structs cannot fail.
        serde_json::to_string_pretty(&Self::entries(palette)).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::model::Swatch;
    use serde_json::Value;

    #[test]
    fn exact_output() {
        let palette = Palette::new(vec![
            Swatch::new(Color::new(255, 0, 0), 3),
            Swatch::new(Color::new(255, 255, 255), 1),
        ]);
        let expected = r##"[
  {
    "name": "color-1",
    "hex": "#ff0000",
    "rgb": "rgb(255, 0, 0)",
    "hsl": "hsl(0, 100%, 50%)",
    "percentage": 75
  },
  {
    "name": "color-2",
    "hex": "#ffffff",
    "rgb": "rgb(255, 255, 255)",
    "hsl": "hsl(0, 0%, 100%)",
    "percentage": 25
  }
]"##;
        assert_eq!(JsonBackend.serialize(&palette), expected);
    }

    #[test]
    fn entry_count_and_percentages() {
        let palette = Palette::new(vec![
            Swatch::new(Color::new(10, 20, 30), 1),
            Swatch::new(Color::new(40, 50, 60), 1),
            Swatch::new(Color::new(70, 80, 90), 1),
        ]);
        let parsed: Value = serde_json::from_str(&JsonBackend.serialize(&palette)).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        for entry in entries {
            assert_eq!(entry["percentage"], 33);
        }
    }

    #[test]
    fn empty_palette_is_empty_array() {
        assert_eq!(JsonBackend.serialize(&Palette::default()), "[]");
    }
}
