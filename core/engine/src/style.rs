//! FILENAME: core/engine/src/style.rs
//! PURPOSE: Color type shared by visualization hints and formatting rules.
//! CONTEXT: Widget configuration stores colors as CSS hex strings; the
//! decoration engine blends them into rgba() backgrounds.

use serde::{Deserialize, Serialize};

/// Opaque RGB color. Transparency is applied per cell via `to_rgba_css`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub const fn black() -> Self {
        Color::new(0, 0, 0)
    }

    /// Convert to a CSS hex color.
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS rgba() with an explicit alpha in `0.0..=1.0`.
    pub fn to_rgba_css(&self, alpha: f64) -> String {
        let alpha = alpha.clamp(0.0, 1.0);
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, round_alpha(alpha))
    }

    /// Parse from hex string (e.g., "#FF0000", "FF0000" or shorthand "#F00").
    /// Alpha is not part of a stored color.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    channels[i] = v * 17;
                }
                Some(Color::new(channels[0], channels[1], channels[2]))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color::new(r, g, b))
            }
            _ => None,
        }
    }
}

/// Three decimals is enough for CSS and keeps float noise out of the string.
fn round_alpha(alpha: f64) -> f64 {
    (alpha * 1000.0).round() / 1000.0
}

impl Default for Color {
    fn default() -> Self {
        Color::black()
    }
}
