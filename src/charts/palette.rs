//! Colour palettes and sequential colour maps.

use plotters::style::RGBColor;

/// Default categorical palette.
pub const DEEP: [[u8; 3]; 10] = [
    [76, 114, 176],  // Blue
    [221, 132, 82],  // Orange
    [85, 168, 104],  // Green
    [196, 78, 82],   // Red
    [129, 114, 179], // Purple
    [147, 120, 96],  // Brown
    [218, 139, 195], // Pink
    [140, 140, 140], // Gray
    [204, 185, 116], // Olive
    [100, 181, 205], // Cyan
];

/// Box edges, whiskers and error bars.
pub const EDGE_GRAY: RGBColor = RGBColor(61, 61, 61);

pub const LIGHT_TEXT: RGBColor = RGBColor(241, 241, 241);
pub const DARK_TEXT: RGBColor = RGBColor(0, 0, 0);

/// Luminance under which text on a shaded cell switches to the light colour.
pub const TEXT_COLOR_THRESHOLD: f64 = 0.408;

const ROCKET: [[u8; 3]; 6] = [
    [3, 5, 26],
    [76, 29, 75],
    [161, 26, 91],
    [232, 63, 63],
    [246, 156, 115],
    [250, 235, 221],
];

const PUBU: [[u8; 3]; 9] = [
    [255, 247, 251],
    [236, 231, 242],
    [208, 209, 230],
    [166, 189, 219],
    [116, 169, 207],
    [54, 144, 192],
    [5, 112, 176],
    [4, 90, 141],
    [2, 56, 88],
];

pub fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

/// Palette entry `index`, cycling.
pub fn pick(palette: &[[u8; 3]], index: usize) -> RGBColor {
    if palette.is_empty() {
        return rgb(DEEP[index % DEEP.len()]);
    }
    rgb(palette[index % palette.len()])
}

/// Mix `color` towards white; `amount` 0 keeps it, 1 gives white.
pub fn lighten(color: RGBColor, amount: f64) -> RGBColor {
    let mix = |c: u8| (c as f64 + (255.0 - c as f64) * amount.clamp(0.0, 1.0)).round() as u8;
    RGBColor(mix(color.0), mix(color.1), mix(color.2))
}

/// Sequential colour maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMap {
    /// Dark purple to cream; heatmaps.
    Rocket,
    /// White to dark blue; table background gradients.
    PuBu,
}

impl ColorMap {
    fn anchors(&self) -> &'static [[u8; 3]] {
        match self {
            ColorMap::Rocket => &ROCKET,
            ColorMap::PuBu => &PUBU,
        }
    }

    /// Colour at `t` in [0, 1], linearly interpolated between anchors.
    pub fn sample(&self, t: f64) -> RGBColor {
        let anchors = self.anchors();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (anchors.len() - 1) as f64;
        let lo = scaled.floor() as usize;
        let hi = (lo + 1).min(anchors.len() - 1);
        let frac = scaled - lo as f64;

        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        RGBColor(
            lerp(anchors[lo][0], anchors[hi][0]),
            lerp(anchors[lo][1], anchors[hi][1]),
            lerp(anchors[lo][2], anchors[hi][2]),
        )
    }

    /// Colour for `value` normalised against `[min, max]`.
    pub fn scaled(&self, value: f64, min: f64, max: f64) -> RGBColor {
        let span = max - min;
        let t = if span > 0.0 { (value - min) / span } else { 0.0 };
        self.sample(t)
    }
}

/// WCAG relative luminance.
pub fn relative_luminance(color: RGBColor) -> f64 {
    let channel = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(color.0) + 0.7152 * channel(color.1) + 0.0722 * channel(color.2)
}

/// Readable text colour on top of `background`.
pub fn text_on(background: RGBColor) -> RGBColor {
    if relative_luminance(background) < TEXT_COLOR_THRESHOLD {
        LIGHT_TEXT
    } else {
        DARK_TEXT
    }
}
