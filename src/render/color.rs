//! Numeric colour values
//!
//! Computed colours are parsed into RGBA components so checks compare
//! numbers with a tolerance instead of one engine's serialization.

use std::fmt;
use std::str::FromStr;

use crate::common::Error;

/// An sRGB colour with alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Fully transparent colours paint nothing, whatever their channels
    pub fn is_transparent(&self) -> bool {
        self.a <= f32::EPSILON
    }

    /// Largest per-channel difference, alpha scaled to 0..255
    pub fn distance(&self, other: &Rgba) -> u8 {
        let alpha = ((self.a - other.a).abs() * 255.0).round().min(255.0) as u8;
        [
            self.r.abs_diff(other.r),
            self.g.abs_diff(other.g),
            self.b.abs_diff(other.b),
            alpha,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    pub fn approx_eq(&self, other: &Rgba, tolerance: u8) -> bool {
        if self.is_transparent() && other.is_transparent() {
            return true;
        }
        self.distance(other) <= tolerance
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.a - 1.0).abs() <= f32::EPSILON {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        let invalid = || Error::ColorParse(s.to_string());

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let args = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'));
        if let Some(args) = args {
            return parse_functional(args).ok_or_else(invalid);
        }

        match value.as_str() {
            "transparent" => Ok(Rgba::TRANSPARENT),
            "black" => Ok(Rgba::rgb(0, 0, 0)),
            "white" => Ok(Rgba::rgb(255, 255, 255)),
            _ => Err(invalid()),
        }
    }
}

/// Parse a computed value holding one or more colours, e.g. the
/// `border-color` shorthand `rgb(0, 0, 0) rgba(0, 0, 0, 0)`.
pub fn parse_color_list(value: &str) -> Result<Vec<Rgba>, Error> {
    let mut colors = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                let token = value[start..i].trim();
                if !token.is_empty() {
                    colors.push(token.parse()?);
                }
                start = i;
            }
            _ => {}
        }
    }
    let token = value[start..].trim();
    if !token.is_empty() {
        colors.push(token.parse()?);
    }

    if colors.is_empty() {
        return Err(Error::ColorParse(value.to_string()));
    }
    Ok(colors)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let short = |c: char| channel(&format!("{c}{c}"));
    let chars: Vec<char> = hex.chars().collect();

    match chars.len() {
        3 => Some(Rgba::rgb(short(chars[0])?, short(chars[1])?, short(chars[2])?)),
        6 => Some(Rgba::rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(Rgba::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            f32::from(channel(&hex[6..8])?) / 255.0,
        )),
        _ => None,
    }
}

/// Both `r, g, b[, a]` and CSS Color 4 `r g b[ / a]` argument forms
fn parse_functional(args: &str) -> Option<Rgba> {
    let (channels, alpha) = match args.split_once('/') {
        Some((channels, alpha)) => (channels, Some(alpha)),
        None => (args, None),
    };

    let mut parts: Vec<&str> = channels
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    let alpha = match alpha {
        Some(a) => Some(a.trim()),
        None if parts.len() == 4 => parts.pop(),
        None => None,
    };
    if parts.len() != 3 {
        return None;
    }

    let r = parse_channel(parts[0])?;
    let g = parse_channel(parts[1])?;
    let b = parse_channel(parts[2])?;
    let a = match alpha {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };
    Some(Rgba::new(r, g, b, a))
}

fn parse_channel(s: &str) -> Option<u8> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? * 2.55,
        None => s.parse::<f32>().ok()?,
    };
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(s: &str) -> Option<f32> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? / 100.0,
        None => s.parse::<f32>().ok()?,
    };
    Some(value.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_forms() {
        assert_eq!("rgb(104, 211, 145)".parse::<Rgba>().unwrap(), Rgba::rgb(104, 211, 145));
        let c: Rgba = "rgba(0, 0, 0, 0)".parse().unwrap();
        assert!(c.is_transparent());
    }

    #[test]
    fn test_parse_space_form_with_alpha() {
        let c: Rgba = "rgb(120 53 15 / 50%)".parse().unwrap();
        assert_eq!((c.r, c.g, c.b), (120, 53, 15));
        assert!((c.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_parse_hex_and_keywords() {
        assert_eq!("#68d391".parse::<Rgba>().unwrap(), Rgba::rgb(0x68, 0xd3, 0x91));
        assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::rgb(255, 255, 255));
        assert!("transparent".parse::<Rgba>().unwrap().is_transparent());
        assert!("bg-color".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_tolerance_comparison() {
        let expected = Rgba::rgb(104, 211, 145);
        assert!(Rgba::rgb(100, 215, 140).approx_eq(&expected, 8));
        assert!(!Rgba::rgb(239, 239, 239).approx_eq(&expected, 8));
        assert!(Rgba::new(1, 2, 3, 0.0).approx_eq(&Rgba::TRANSPARENT, 0));
    }

    #[test]
    fn test_color_list_shorthand() {
        let colors = parse_color_list("rgb(226, 232, 240) rgba(0, 0, 0, 0)").unwrap();
        assert_eq!(colors.len(), 2);
        assert!(!colors[0].is_transparent());
        assert!(colors[1].is_transparent());
        assert!(parse_color_list("  ").is_err());
    }

    #[test]
    fn test_display_matches_engine_form() {
        assert_eq!(Rgba::TRANSPARENT.to_string(), "rgba(0, 0, 0, 0)");
        assert_eq!(Rgba::rgb(219, 112, 147).to_string(), "rgb(219, 112, 147)");
    }
}
