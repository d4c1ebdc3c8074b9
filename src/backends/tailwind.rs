use crate::model::Palette;

use super::ExportBackend;

/// `tailwind.config.js` extending the theme colors.
pub struct TailwindBackend;

impl ExportBackend for TailwindBackend {
    fn name(&self) -> &str {
        "Tailwind"
    }

    fn filename(&self) -> &str {
        "tailwind.config.js"
    }

    fn serialize(&self, palette: &Palette) -> String {
        let mut out = String::new();
        out.push_str("module.exports = {\n");
        out.push_str("  theme: {\n");
        out.push_str("    extend: {\n");
        out.push_str("      colors: {\n");
        let colors: Vec<String> = palette
            .iter()
            .enumerate()
            .map(|(i, swatch)| format!("        'palette-{}': '{}',", i + 1, swatch.hex()))
            .collect();
        out.push_str(&colors.join("\n"));
        out.push_str("\n      },\n");
        out.push_str("    },\n");
        out.push_str("  },\n");
        out.push('}');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::model::Swatch;

    #[test]
    fn exact_output() {
        let palette = Palette::new(vec![
            Swatch::new(Color::new(255, 0, 0), 2),
            Swatch::new(Color::new(0, 0, 0), 1),
        ]);
        let expected = "module.exports = {\n  theme: {\n    extend: {\n      colors: {\n        'palette-1': '#ff0000',\n        'palette-2': '#000000',\n      },\n    },\n  },\n}";
        assert_eq!(TailwindBackend.serialize(&palette), expected);
    }

    #[test]
    fn one_key_per_color() {
        let palette = Palette::new(
            (0..4u8)
                .map(|i| Swatch::new(Color::new(i, i, i), 1))
                .collect(),
        );
        let output = TailwindBackend.serialize(&palette);
        for i in 1..=4 {
            assert!(
                output.contains(&format!("'palette-{i}': '#")),
                "missing palette-{i}"
            );
        }
        assert!(!output.contains("'palette-5'"));
    }
}
