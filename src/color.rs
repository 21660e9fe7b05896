use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues, starting
/// at `start_hue` degrees.
pub fn generate_palette(n: usize, start_hue: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = start_hue + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.65);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Bar colours: pass status → Color32
// ---------------------------------------------------------------------------

/// Fill colours for passing and failing bars.
#[derive(Debug, Clone, Copy)]
pub struct PassColors {
    pub passed: Color32,
    pub failed: Color32,
}

impl Default for PassColors {
    fn default() -> Self {
        // Sky blue for passing, the opposite hue for failing.
        let palette = generate_palette(2, 197.0);
        Self {
            passed: palette[0],
            failed: palette[1],
        }
    }
}

impl PassColors {
    pub fn color_for(&self, passed: bool) -> Color32 {
        if passed { self.passed } else { self.failed }
    }

    /// Legend entries (label → colour) for the UI.
    pub fn legend_entries(&self) -> [(&'static str, Color32); 2] {
        [("passed", self.passed), ("failed", self.failed)]
    }
}
