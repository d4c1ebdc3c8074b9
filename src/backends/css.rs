use crate::model::Palette;

use super::ExportBackend;

/// CSS custom properties on `:root`.
pub struct CssBackend;

impl ExportBackend for CssBackend {
    fn name(&self) -> &str {
        "CSS"
    }

    fn filename(&self) -> &str {
        "palette.css"
    }

    fn serialize(&self, palette: &Palette) -> String {
        let declarations: Vec<String> = palette
            .iter()
            .enumerate()
            .map(|(i, swatch)| format!("  --color-{}: {};", i + 1, swatch.hex()))
            .collect();

        format!(":root {{\n{}\n}}", declarations.join("\n"))
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
            Swatch::new(Color::new(0, 128, 255), 1),
        ]);
        assert_eq!(
            CssBackend.serialize(&palette),
            ":root {\n  --color-1: #ff0000;\n  --color-2: #0080ff;\n}"
        );
    }

    #[test]
    fn declarations_follow_display_order() {
        let palette = Palette::new(
            (0..5u8)
                .map(|i| Swatch::new(Color::new(i * 40, 0, 0), u64::from(10 - i)))
                .collect(),
        );
        let output = CssBackend.serialize(&palette);
        let indices: Vec<&str> = output
            .lines()
            .filter_map(|l| l.trim().strip_prefix("--color-"))
            .map(|rest| rest.split(':').next().unwrap_or(""))
            .collect();
        assert_eq!(indices, ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn empty_palette_still_produces_a_block() {
        assert_eq!(CssBackend.serialize(&Palette::default()), ":root {\n\n}");
    }
}
