//! Color tokens and gradient descriptors.
//!
//! Styles store colors as CSS-like strings (`#ff8800`, `rgba(0,0,0,0.5)`,
//! `white`) and gradients as descriptors such as
//! `linear-gradient(90deg, #ff0080 0%, #7928ca 100%)`. Only the first and last
//! color stop of a gradient are meaningful to the rasterizer.

use serde::{Deserialize, Serialize};

/// An 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha (255 = opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque color from components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a color token. Returns `None` for anything unrecognised.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(hex) = token.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = token.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            return parse_functional(args.trim_end_matches(')'));
        }
        named(&lower)
    }

    /// This color with its alpha multiplied by `opacity` (clamped to 0..=1).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        Self {
            a: (f32::from(self.a) * opacity).round() as u8,
            ..self
        }
    }

    /// Format as `#rrggbb` (opaque) or `#rrggbbaa`.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba {
            r: nibble(0)?,
            g: nibble(1)?,
            b: nibble(2)?,
            a: nibble(3)?,
        }),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: byte(6)?,
        }),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_functional(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }
    let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let alpha = match parts.get(3) {
        Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };
    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: alpha,
    })
}

fn named(name: &str) -> Option<Rgba> {
    let color = match name {
        "white" => Rgba::WHITE,
        "black" => Rgba::BLACK,
        "transparent" => Rgba::TRANSPARENT,
        "red" => Rgba::rgb(255, 0, 0),
        "green" => Rgba::rgb(0, 128, 0),
        "blue" => Rgba::rgb(0, 0, 255),
        "yellow" => Rgba::rgb(255, 255, 0),
        "orange" => Rgba::rgb(255, 165, 0),
        "purple" => Rgba::rgb(128, 0, 128),
        "pink" => Rgba::rgb(255, 192, 203),
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

/// Every color token in a gradient descriptor, in order of appearance.
#[must_use]
pub fn gradient_colors(descriptor: &str) -> Vec<Rgba> {
    let descriptor: String = descriptor.chars().filter(char::is_ascii).collect();
    let mut colors = Vec::new();
    let bytes = descriptor.as_bytes();
    let lower = descriptor.to_ascii_lowercase();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'#' {
            let end = descriptor[i + 1..]
                .find(|c: char| !c.is_ascii_hexdigit())
                .map_or(bytes.len(), |n| i + 1 + n);
            if let Some(c) = Rgba::parse(&descriptor[i..end]) {
                colors.push(c);
            }
            i = end.max(i + 1);
        } else if lower[i..].starts_with("rgb") {
            let end = descriptor[i..].find(')').map_or(bytes.len(), |n| i + n + 1);
            if let Some(c) = Rgba::parse(&descriptor[i..end]) {
                colors.push(c);
            }
            i = end.max(i + 1);
        } else if bytes[i].is_ascii_alphabetic() {
            let end = descriptor[i..]
                .find(|c: char| !c.is_ascii_alphabetic() && c != '-')
                .map_or(bytes.len(), |n| i + n);
            if let Some(c) = named(&lower[i..end]) {
                colors.push(c);
            }
            i = end.max(i + 1);
        } else {
            i += 1;
        }
    }
    colors
}

/// First and last color stop of a gradient descriptor.
///
/// A descriptor with a single color yields that color twice; one with none
/// yields `None`.
#[must_use]
pub fn gradient_stops(descriptor: &str) -> Option<(Rgba, Rgba)> {
    let colors = gradient_colors(descriptor);
    let first = *colors.first()?;
    let last = *colors.last()?;
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::parse("#FF8800"), Some(Rgba::rgb(255, 136, 0)));
        assert_eq!(
            Rgba::parse("#00000080"),
            Some(Rgba {
                r: 0,
                g: 0,
                b: 0,
                a: 128
            })
        );
        assert_eq!(Rgba::parse("#12"), None);
        assert_eq!(Rgba::parse("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_functional_and_named() {
        assert_eq!(Rgba::parse("rgb(10, 20, 30)"), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(Rgba::parse("rgba(255,0,0,0.5)").map(|c| c.a), Some(128));
        assert_eq!(Rgba::parse("White"), Some(Rgba::WHITE));
        assert_eq!(Rgba::parse("chartreuse-ish"), None);
    }

    #[test]
    fn test_gradient_stops_first_and_last() {
        let stops = gradient_stops("linear-gradient(90deg, #ff0000 0%, rgb(0,255,0) 50%, #0000ff 100%)");
        assert_eq!(stops, Some((Rgba::rgb(255, 0, 0), Rgba::rgb(0, 0, 255))));
    }

    #[test]
    fn test_gradient_named_and_direction_words() {
        let stops = gradient_stops("linear-gradient(to right, white, black)");
        assert_eq!(stops, Some((Rgba::WHITE, Rgba::BLACK)));
        assert_eq!(gradient_stops("linear-gradient(45deg)"), None);
    }

    #[test]
    fn test_with_opacity_scales_alpha() {
        assert_eq!(Rgba::WHITE.with_opacity(0.5).a, 128);
        assert_eq!(Rgba::WHITE.to_hex(), "#ffffff");
    }
}
