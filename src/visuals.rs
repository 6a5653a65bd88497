//! Colors, palettes and gradients shared by every renderer.
//!
//! Colors are linear `Vec3` RGB triples in `0.0..=1.0`, written in the same
//! space as the CSS hex strings they come from. Alpha always travels as a
//! separate `f32` so that opacity can be animated without touching the color.
//!
//! ```ignore
//! let palette = Palette::from_hex(&["#3b82f6", "#8b5cf6"])?;
//! let blue = parse_hex("#3b82f6")?;
//! ```

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Hex strings of the default particle palette (blue, violet, cyan, emerald, amber).
pub const DEFAULT_PALETTE_HEX: [&str; 5] = ["#3b82f6", "#8b5cf6", "#06b6d4", "#10b981", "#f59e0b"];

/// Parse a CSS-style `#rrggbb` or `#rgb` color.
///
/// The leading `#` is optional. Returns [`ConfigError::InvalidColor`] for
/// anything else.
pub fn parse_hex(hex: &str) -> Result<Vec3, ConfigError> {
    let digits = hex.trim().trim_start_matches('#');
    let invalid = || ConfigError::InvalidColor(hex.to_string());

    if !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    let (r, g, b) = match digits.len() {
        6 => (
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ),
        3 => {
            let r = channel(&digits[0..1])?;
            let g = channel(&digits[1..2])?;
            let b = channel(&digits[2..3])?;
            (r * 17, g * 17, b * 17)
        }
        _ => return Err(invalid()),
    };

    Ok(rgb8(r, g, b))
}

/// Build a color from 8-bit channels.
#[inline]
pub fn rgb8(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

/// A fixed, non-empty set of colors particles are tinted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<Vec3>,
}

impl Palette {
    /// Build a palette from explicit colors.
    ///
    /// An empty list yields the default palette so that the pool always has
    /// something to sample from.
    pub fn new(colors: Vec<Vec3>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }

    /// Build a palette from hex strings.
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, ConfigError> {
        let colors = hex
            .iter()
            .map(|h| parse_hex(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(colors))
    }

    /// All colors in order.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Number of colors (always at least one).
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Pick a color uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        self.colors[rng.gen_range(0..self.colors.len())]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                rgb8(0x3b, 0x82, 0xf6),
                rgb8(0x8b, 0x5c, 0xf6),
                rgb8(0x06, 0xb6, 0xd4),
                rgb8(0x10, 0xb9, 0x81),
                rgb8(0xf5, 0x9e, 0x0b),
            ],
        }
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = ConfigError;

    fn try_from(hex: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_hex(&hex)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors.iter().map(|c| to_hex(*c)).collect()
    }
}

/// Format a color as `#rrggbb`.
pub fn to_hex(color: Vec3) -> String {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    format!("#{:02x}{:02x}{:02x}", c.x as u8, c.y as u8, c.z as u8)
}

/// Serde adapter storing a `Vec3` color as a `#rrggbb` string.
pub(crate) mod hex_color {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Vec3, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec3, D::Error> {
        let hex = String::deserialize(deserializer)?;
        super::parse_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// One color stop of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, `0.0..=1.0`.
    pub offset: f32,
    /// Stop color.
    pub color: Vec3,
    /// Stop opacity.
    pub alpha: f32,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Vec3, alpha: f32) -> Self {
        Self { offset, color, alpha }
    }
}

/// Sample a gradient at `t`, returning `(color, alpha)`.
///
/// Stops must be sorted by offset. Outside the covered range the nearest stop
/// is returned; an empty slice samples as transparent black.
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> (Vec3, f32) {
    let Some(first) = stops.first() else {
        return (Vec3::ZERO, 0.0);
    };
    if t <= first.offset {
        return (first.color, first.alpha);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let k = if span > f32::EPSILON { (t - a.offset) / span } else { 1.0 };
            return (a.color.lerp(b.color, k), a.alpha + (b.alpha - a.alpha) * k);
        }
    }
    // Non-empty, checked above.
    let last = stops[stops.len() - 1];
    (last.color, last.alpha)
}

/// Blue end of the connection line gradient (`rgb(59,130,246)`).
pub const CONNECTION_EDGE: Vec3 = Vec3::new(59.0 / 255.0, 130.0 / 255.0, 246.0 / 255.0);
/// Violet middle of the connection line gradient (`rgb(139,92,246)`).
pub const CONNECTION_MIDDLE: Vec3 = Vec3::new(139.0 / 255.0, 92.0 / 255.0, 246.0 / 255.0);

/// Three-stop blue-violet-blue gradient used for connection lines.
pub fn connection_gradient(alpha: f32) -> [GradientStop; 3] {
    [
        GradientStop::new(0.0, CONNECTION_EDGE, alpha),
        GradientStop::new(0.5, CONNECTION_MIDDLE, alpha),
        GradientStop::new(1.0, CONNECTION_EDGE, alpha),
    ]
}

/// Visual parameters of the backdrop that are not per-particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Color laid over the whole surface each frame.
    pub wash_color: Vec3,
    /// Opacity of the wash. Low values leave fading trails on persistent canvases.
    pub wash_alpha: f32,
    /// Page background the window clears to.
    pub background: Vec3,
    /// Blur radius of the outer particle glow.
    pub glow_blur: f32,
    /// Outer glow radius as a multiple of particle size.
    pub glow_scale: f32,
    /// Width of connection lines.
    pub line_width: f32,
    /// Peak opacity of a connection line (two coincident particles).
    pub line_max_alpha: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            wash_color: rgb8(248, 250, 252),
            wash_alpha: 0.02,
            background: rgb8(248, 250, 252),
            glow_blur: 2.0,
            glow_scale: 2.0,
            line_width: 1.0,
            line_max_alpha: 0.15,
        }
    }
}
