use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Colour gradients for bar charts
// ---------------------------------------------------------------------------

/// A piecewise-linear gradient through evenly spaced sRGB stops.
#[derive(Debug, Clone, Copy)]
pub struct Gradient {
    stops: &'static [(u8, u8, u8)],
}

/// Diverging blue → grey → red, used for side effects.
pub const COOLWARM: Gradient = Gradient {
    stops: &[(59, 76, 192), (141, 176, 254), (221, 221, 221), (244, 154, 123), (180, 4, 38)],
};

/// Perceptual black → purple → orange → cream, used for conditions.
pub const MAGMA: Gradient = Gradient {
    stops: &[(0, 0, 4), (81, 18, 124), (183, 55, 121), (252, 137, 97), (252, 253, 191)],
};

impl Gradient {
    /// Colour at `t` in `[0, 1]`, interpolated in linear RGB.
    pub fn at(&self, t: f32) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        let segments = self.stops.len().saturating_sub(1);
        if segments == 0 {
            return self.stops.first().map_or(Color32::GRAY, |&(r, g, b)| Color32::from_rgb(r, g, b));
        }
        let scaled = t * segments as f32;
        let i = (scaled.floor() as usize).min(segments - 1);
        let local = scaled - i as f32;

        let a = linear(self.stops[i]);
        let b = linear(self.stops[i + 1]);
        let mixed: Srgb = Srgb::from_linear(a.mix(b, local));
        let rgb: Srgb<u8> = mixed.into_format();
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }

    /// `n` colours sampled evenly from end to end.
    pub fn sample(&self, n: usize) -> Vec<Color32> {
        match n {
            0 => Vec::new(),
            1 => vec![self.at(0.5)],
            _ => (0..n).map(|i| self.at(i as f32 / (n - 1) as f32)).collect(),
        }
    }
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}
