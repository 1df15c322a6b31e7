use serde::{Deserialize, Serialize};

/// A two-color palette. Fields hold whatever the user chose; validation
/// happens at the point of CSS generation, and an invalid or absent color is
/// simply treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

impl Palette {
    pub fn valid_primary(&self) -> Option<&str> {
        self.primary.as_deref().filter(|c| is_hex_color(c))
    }

    pub fn valid_accent(&self) -> Option<&str> {
        self.accent.as_deref().filter(|c| is_hex_color(c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// `#RRGGBB`, case-insensitive. No shorthand or 8-digit forms.
pub fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parses each 2-hex-digit pair base-16. `None` for anything that fails the
/// hex-color pattern.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    if !is_hex_color(hex) {
        return None;
    }
    let r = u8::from_str_radix(&hex[1..3], 16).ok()?;
    let g = u8::from_str_radix(&hex[3..5], 16).ok()?;
    let b = u8::from_str_radix(&hex[5..7], 16).ok()?;
    Some(Rgb { r, g, b })
}
