use eframe::egui::Color32;
use palette::{IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Sequential colour scale
// ---------------------------------------------------------------------------

/// ColorBrewer "YlGnBu", light yellow → dark blue.
const YL_GN_BU: [(u8, u8, u8); 9] = [
    (255, 255, 217),
    (237, 248, 177),
    (199, 233, 180),
    (127, 205, 187),
    (65, 182, 196),
    (29, 145, 192),
    (34, 94, 168),
    (37, 52, 148),
    (8, 29, 88),
];

/// Maps a numeric domain onto the YlGnBu stops, interpolating in linear RGB.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<LinSrgb>,
    low: f64,
    high: f64,
}

impl ColorScale {
    /// Scale over `[low, high]`.  A degenerate domain maps everything to the
    /// middle of the scale.
    pub fn new(low: f64, high: f64) -> Self {
        let stops = YL_GN_BU
            .iter()
            .map(|&(r, g, b)| {
                let srgb = Srgb::new(r, g, b).into_format::<f32>();
                srgb.into_color()
            })
            .collect();
        Self { stops, low, high }
    }

    /// Position of `value` in the domain, clamped to `[0, 1]`.
    pub fn position(&self, value: f64) -> f32 {
        let span = self.high - self.low;
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.low) / span).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let t = self.position(value) * (self.stops.len() - 1) as f32;
        let i = (t.floor() as usize).min(self.stops.len() - 2);
        let mixed = self.stops[i].mix(self.stops[i + 1], t - i as f32);
        let rgb: Srgb = mixed.into_color();
        Color32::from_rgb(
            (rgb.red * 255.0).round() as u8,
            (rgb.green * 255.0).round() as u8,
            (rgb.blue * 255.0).round() as u8,
        )
    }

    /// Label colour that stays readable on top of [`Self::color_for`].
    pub fn text_color_for(&self, value: f64) -> Color32 {
        if self.position(value) > 0.55 {
            Color32::WHITE
        } else {
            Color32::BLACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_match_first_and_last_stop() {
        let scale = ColorScale::new(0.4, 1.4);
        assert_eq!(scale.color_for(0.4), Color32::from_rgb(255, 255, 217));
        assert_eq!(scale.color_for(1.4), Color32::from_rgb(8, 29, 88));
        // Out-of-domain values clamp.
        assert_eq!(scale.color_for(-3.0), scale.color_for(0.4));
        assert_eq!(scale.color_for(9.0), scale.color_for(1.4));
    }

    #[test]
    fn test_midpoint_sits_in_the_middle() {
        let scale = ColorScale::new(0.4, 1.4);
        assert!((scale.position(0.9) - 0.5).abs() < 1e-6);
        assert_eq!(scale.color_for(0.9), Color32::from_rgb(65, 182, 196));
    }

    #[test]
    fn test_degenerate_domain() {
        let scale = ColorScale::new(0.9, 0.9);
        assert_eq!(scale.position(0.9), 0.5);
        assert_eq!(scale.text_color_for(0.9), Color32::BLACK);
    }

    #[test]
    fn test_text_contrast() {
        let scale = ColorScale::new(0.0, 2.0);
        assert_eq!(scale.text_color_for(0.1), Color32::BLACK);
        assert_eq!(scale.text_color_for(1.9), Color32::WHITE);
    }
}
