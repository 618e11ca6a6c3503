//! Colors are authored the way a stylesheet would write them (`hsl(...)`, `0xRRGGBB`)
//! and shaded in linear space, so everything converts through sRGB first.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    #[cfg(test)]
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Linear color from a 24-bit sRGB hex value.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self::from_srgb(r, g, b)
    }

    /// Linear color from `hsl(hue, saturation%, lightness%)`.
    /// Hue is in degrees and wraps; saturation and lightness are percentages.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let [r, g, b] = hsl_to_srgb(hue, saturation, lightness);
        Self::from_srgb(r, g, b)
    }

    pub fn from_srgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: srgb_to_linear(r),
            g: srgb_to_linear(g),
            b: srgb_to_linear(b),
        }
    }

    pub fn scaled(self, intensity: f32) -> [f32; 3] {
        [self.r * intensity, self.g * intensity, self.b * intensity]
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// `hsl()` to gamma-encoded RGB in `[0, 1]`. Saturation/lightness are clamped
/// to `[0, 100]` the way a CSS parser clamps them.
pub fn hsl_to_srgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn hsl_primaries() {
        assert!(close(hsl_to_srgb(0.0, 100.0, 50.0), [1.0, 0.0, 0.0]));
        assert!(close(hsl_to_srgb(120.0, 100.0, 50.0), [0.0, 1.0, 0.0]));
        assert!(close(hsl_to_srgb(240.0, 100.0, 50.0), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn hsl_hue_wraps() {
        assert!(close(hsl_to_srgb(360.0, 85.0, 50.0), hsl_to_srgb(0.0, 85.0, 50.0)));
        assert!(close(hsl_to_srgb(-120.0, 30.0, 40.0), hsl_to_srgb(240.0, 30.0, 40.0)));
    }

    #[test]
    fn zero_saturation_is_grey() {
        let [r, g, b] = hsl_to_srgb(200.0, 0.0, 40.0);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert!((r - 0.4).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_lightness_is_clamped() {
        assert!(close(hsl_to_srgb(90.0, 30.0, -20.0), [0.0, 0.0, 0.0]));
        assert!(close(hsl_to_srgb(90.0, 30.0, 140.0), [1.0, 1.0, 1.0]));
    }

    #[test]
    fn hex_white_and_black() {
        assert!(close(Color::from_hex(0xffffff).to_array(), Color::WHITE.to_array()));
        let black = Color::from_hex(0x000000);
        assert_eq!(black.to_array(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn hex_mid_grey_is_linearized() {
        let c = Color::from_hex(0x808080);
        assert!((c.r - 0.2158605).abs() < 1e-4);
    }
}
