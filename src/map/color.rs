//! Branch colors: a cyclic palette for top-level branches and per-depth
//! lightening for their descendants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{0}`: expected `rgb(r, g, b)` or `#rrggbb`")]
pub struct ColorError(pub String);

/// An opaque 8-bit RGB color.
///
/// Serialised as `rgb(r, g, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Blend toward white. `factor` 0 leaves the color unchanged, 1 yields
    /// white; values outside `[0, 1]` are clamped.
    pub fn lighten(self, factor: f32) -> Rgb {
        let factor = if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, 1.0)
        };
        let channel = |c: u8| -> u8 {
            let c = f32::from(c);
            (c + (255.0 - c) * factor).round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(channel(self.r), channel(self.g), channel(self.b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ColorError(trimmed.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(err());
            }
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            return Ok(Rgb::new(byte(0)?, byte(2)?, byte(4)?));
        }

        let inner = trimmed
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let channels = inner
            .split(',')
            .map(|part| part.trim().parse::<u8>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()?;
        match channels.as_slice() {
            [r, g, b] => Ok(Rgb::new(*r, *g, *b)),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Blue, green, orange, red, purple.
pub const DEFAULT_PALETTE: [Rgb; 5] = [
    Rgb::new(56, 127, 237),
    Rgb::new(82, 196, 26),
    Rgb::new(250, 176, 5),
    Rgb::new(235, 87, 87),
    Rgb::new(147, 51, 234),
];

/// Ordered branch colors. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build a palette; an empty list falls back to [`DEFAULT_PALETTE`].
    pub fn new(colors: Vec<Rgb>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// `colors[index mod len]`: branches past the palette size reuse colors.
    pub fn color_for_branch(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighten_zero_is_identity() {
        for color in DEFAULT_PALETTE {
            assert_eq!(color.lighten(0.0), color);
        }
    }

    #[test]
    fn lighten_one_is_white() {
        for color in DEFAULT_PALETTE {
            assert_eq!(color.lighten(1.0), Rgb::WHITE);
        }
    }

    #[test]
    fn lighten_is_monotonic_and_clamped() {
        let base = Rgb::new(56, 127, 237);
        let mut prev = base;
        for step in 1..=10 {
            let next = base.lighten(step as f32 / 10.0);
            assert!(next.r >= prev.r && next.g >= prev.g && next.b >= prev.b);
            prev = next;
        }
        assert_eq!(base.lighten(3.0), Rgb::WHITE);
        assert_eq!(base.lighten(-1.0), base);
    }

    #[test]
    fn lighten_matches_channel_formula() {
        // 56 + 199 * 0.2 = 95.8, 127 + 128 * 0.2 = 152.6, 237 + 18 * 0.2 = 240.6
        assert_eq!(Rgb::new(56, 127, 237).lighten(0.2), Rgb::new(96, 153, 241));
    }

    #[test]
    fn palette_cycles() {
        let palette = Palette::new(DEFAULT_PALETTE[..3].to_vec());
        assert_eq!(palette.color_for_branch(0), DEFAULT_PALETTE[0]);
        assert_eq!(palette.color_for_branch(2), DEFAULT_PALETTE[2]);
        assert_eq!(palette.color_for_branch(3), DEFAULT_PALETTE[0]);
    }

    #[test]
    fn empty_palette_falls_back_to_default() {
        assert_eq!(Palette::new(Vec::new()), Palette::default());
    }

    #[test]
    fn parses_rgb_and_hex() {
        assert_eq!("rgb(56, 127, 237)".parse(), Ok(Rgb::new(56, 127, 237)));
        assert_eq!("#387fed".parse(), Ok(Rgb::new(56, 127, 237)));
        assert!("rgb(1, 2)".parse::<Rgb>().is_err());
        assert!("#38".parse::<Rgb>().is_err());
        assert!("blue".parse::<Rgb>().is_err());
    }

    #[test]
    fn display_and_hex() {
        let c = Rgb::new(250, 176, 5);
        assert_eq!(c.to_string(), "rgb(250, 176, 5)");
        assert_eq!(c.to_hex(), "#fab005");
    }
}
