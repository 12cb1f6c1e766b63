//! Heat-map coloring for edit activity.
//!
//! Three contiguous bands, each interpolating a single channel:
//! - cool: blue fades out, `(100, 200, 255)` → `(100, 200, 100)`
//! - warm: red rises, `(100, 200, 100)` → `(255, 200, 100)`
//! - hot: green falls, `(255, 200, 100)` → `(255, 100, 100)`

use bevy::color::Color;

/// Upper bound of the cool band.
pub const COOL_BAND_END: f32 = 0.33;
/// Upper bound of the warm band.
pub const WARM_BAND_END: f32 = 0.66;

/// An sRGB color with channels in `0.0..=255.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Largest per-channel difference to `other`.
    pub fn max_channel_delta(&self, other: &Rgb) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }

    /// Scale every channel, saturating at 255.
    pub fn scaled(&self, factor: f32) -> Rgb {
        Rgb::new(
            (self.r * factor).clamp(0.0, 255.0),
            (self.g * factor).clamp(0.0, 255.0),
            (self.b * factor).clamp(0.0, 255.0),
        )
    }

    /// Blend toward white by `amount` in `0..=1`.
    pub fn whitened(&self, amount: f32) -> Rgb {
        let t = amount.clamp(0.0, 1.0);
        Rgb::new(
            self.r + (255.0 - self.r) * t,
            self.g + (255.0 - self.g) * t,
            self.b + (255.0 - self.b) * t,
        )
    }

    pub fn to_color(self) -> Color {
        Color::srgb(self.r / 255.0, self.g / 255.0, self.b / 255.0)
    }
}

const COOL: Rgb = Rgb::new(100.0, 200.0, 255.0);
const WARM: Rgb = Rgb::new(100.0, 200.0, 100.0);
const HOT: Rgb = Rgb::new(255.0, 200.0, 100.0);
const HOTTEST: Rgb = Rgb::new(255.0, 100.0, 100.0);

/// Normalized activity in `[0, 1]`. A non-positive `max_value` yields 0.
pub fn intensity(value: f32, max_value: f32) -> f32 {
    if max_value.is_nan() || max_value <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / max_value).clamp(0.0, 1.0)
}

/// Map an activity score to its heat-map color.
pub fn heat_map_color(value: f32, max_value: f32) -> Rgb {
    let i = intensity(value, max_value);

    if i < COOL_BAND_END {
        let t = i / COOL_BAND_END;
        Rgb::new(COOL.r, COOL.g, lerp(COOL.b, WARM.b, t))
    } else if i < WARM_BAND_END {
        let t = (i - COOL_BAND_END) / (WARM_BAND_END - COOL_BAND_END);
        Rgb::new(lerp(WARM.r, HOT.r, t), WARM.g, WARM.b)
    } else {
        let t = (i - WARM_BAND_END) / (1.0 - WARM_BAND_END);
        Rgb::new(HOT.r, lerp(HOT.g, HOTTEST.g, t), HOT.b)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed_and_distinct() {
        let low = heat_map_color(0.0, 50.0);
        let high = heat_map_color(50.0, 50.0);
        assert_eq!(low, COOL);
        assert_eq!(high, HOTTEST);
        assert_ne!(low, high);
        assert_eq!(heat_map_color(0.0, 7.0), heat_map_color(0.0, 1000.0));
    }

    #[test]
    fn test_continuous_at_band_boundaries() {
        for boundary in [COOL_BAND_END, WARM_BAND_END] {
            let below = heat_map_color(boundary - 1e-4, 1.0);
            let at = heat_map_color(boundary, 1.0);
            assert!(below.max_channel_delta(&at) < 0.5, "jump at {}", boundary);
        }
    }

    #[test]
    fn test_heat_is_monotonic() {
        // warmth: red up, then green down, with blue fading first
        let mut previous = heat_map_color(0.0, 1.0);
        for step in 1..=100 {
            let color = heat_map_color(step as f32 / 100.0, 1.0);
            assert!(color.r >= previous.r);
            assert!(color.g <= previous.g);
            assert!(color.b <= previous.b);
            previous = color;
        }
    }

    #[test]
    fn test_degenerate_max_is_zero_intensity() {
        assert_eq!(intensity(5.0, 0.0), 0.0);
        assert_eq!(heat_map_color(5.0, 0.0), COOL);
        assert_eq!(heat_map_color(f32::NAN, 10.0), COOL);
        assert_eq!(heat_map_color(99.0, 10.0), HOTTEST);
        assert_eq!(heat_map_color(-3.0, 10.0), COOL);
    }
}
