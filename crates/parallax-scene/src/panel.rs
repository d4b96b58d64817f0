use parallax_engine::paint::{Color, ColorParseError};

/// Colors offered by [`DebugPanel::cycle`], starting with the default.
pub const PRESETS: [&str; 5] = ["#ffeded", "#ffd3a5", "#a5d8ff", "#c3fae8", "#e599f7"];

/// The one tweakable parameter: the shared material color.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugPanel {
    material_color: String,
    color: Color,
    /// Index into [`PRESETS`] of the last preset applied.
    preset: usize,
}

impl DebugPanel {
    pub fn new(material_color: &str) -> Result<Self, ColorParseError> {
        let color = Color::from_hex(material_color)?;
        let preset = PRESETS
            .iter()
            .position(|p| p.eq_ignore_ascii_case(material_color.trim()))
            .unwrap_or(0);
        Ok(Self {
            material_color: material_color.trim().to_string(),
            color,
            preset,
        })
    }

    pub fn material_color(&self) -> &str {
        &self.material_color
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Sets the color from a hex string. The panel is unchanged on error.
    pub fn set_color(&mut self, hex: &str) -> Result<Color, ColorParseError> {
        self.color = Color::from_hex(hex)?;
        self.material_color = hex.trim().to_string();
        log::info!("materialColor = {}", self.material_color);
        Ok(self.color)
    }

    /// Advances to the next preset and returns its color.
    pub fn cycle(&mut self) -> Color {
        self.preset = (self.preset + 1) % PRESETS.len();
        let hex = PRESETS[self.preset];
        match self.set_color(hex) {
            Ok(c) => c,
            // Presets are valid literals; keep the current color otherwise.
            Err(e) => {
                log::warn!("{e}");
                self.color
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_all_parse() {
        for p in PRESETS {
            assert!(Color::from_hex(p).is_ok(), "{p}");
        }
    }

    #[test]
    fn cycle_wraps_around() {
        let mut panel = DebugPanel::new("#ffeded").unwrap();
        for _ in 0..PRESETS.len() {
            panel.cycle();
        }
        assert_eq!(panel.material_color(), "#ffeded");
    }

    #[test]
    fn bad_hex_leaves_panel_untouched() {
        let mut panel = DebugPanel::new("#ffeded").unwrap();
        let before = panel.clone();
        assert!(panel.set_color("#12345").is_err());
        assert_eq!(panel, before);
    }

    #[test]
    fn custom_start_color_cycles_from_first_preset() {
        let mut panel = DebugPanel::new("#000").unwrap();
        panel.cycle();
        assert_eq!(panel.material_color(), PRESETS[1]);
    }
}
