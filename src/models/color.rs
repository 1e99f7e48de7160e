//! Opaque RGBA color values used by manifest entries

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors raised while producing or parsing a color
#[derive(Debug, Error)]
pub enum ColorError {
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
    #[error("Histogram tool failed: {0}")]
    Tool(String),
    #[error("Histogram output has no colors")]
    EmptyHistogram,
}

/// An RGB color whose alpha channel is always `FF`.
///
/// Only the color channels are stored, so a transparent value cannot be
/// represented. Renders as `#RRGGBBFF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// Substituted whenever a coin's dominant color cannot be derived
    pub const FALLBACK: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex digits without the leading `#`, e.g. `F7931AFF`
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}FF", self.r, self.g, self.b)
    }

    /// Pure black or pure white, usually an icon background rather than the coin's color
    pub fn is_background(&self) -> bool {
        *self == Self::BLACK || *self == Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    /// Accepts `RRGGBB` or `RRGGBBAA`, with or without `#`, any case.
    /// A supplied alpha is discarded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if !(digits.len() == 6 || digits.len() == 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ColorError::InvalidHex(s.to_string()))
        };

        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
