//! Named colours used by the chart styles.

use crate::error::{ReportError, Result};
use plotters::style::RGBColor;

/// CSS / matplotlib colour names understood in chart configs.
pub const NAMED_COLORS: [(&str, RGBColor); 24] = [
    ("aqua", RGBColor(0, 255, 255)),
    ("black", RGBColor(0, 0, 0)),
    ("blue", RGBColor(0, 0, 255)),
    ("coral", RGBColor(255, 127, 80)),
    ("cornflowerblue", RGBColor(100, 149, 237)),
    ("crimson", RGBColor(220, 20, 60)),
    ("darkcyan", RGBColor(0, 139, 139)),
    ("gold", RGBColor(255, 215, 0)),
    ("green", RGBColor(0, 128, 0)),
    ("grey", RGBColor(128, 128, 128)),
    ("gray", RGBColor(128, 128, 128)),
    ("indianred", RGBColor(205, 92, 92)),
    ("lightcoral", RGBColor(240, 128, 128)),
    ("lightgrey", RGBColor(211, 211, 211)),
    ("lightgray", RGBColor(211, 211, 211)),
    ("lime", RGBColor(0, 255, 0)),
    ("mistyrose", RGBColor(255, 228, 225)),
    ("orange", RGBColor(255, 165, 0)),
    ("purple", RGBColor(128, 0, 128)),
    ("red", RGBColor(255, 0, 0)),
    ("steelblue", RGBColor(70, 130, 180)),
    ("tab:blue", RGBColor(31, 119, 180)), // matplotlib default line colour
    ("teal", RGBColor(0, 128, 128)),
    ("wheat", RGBColor(245, 222, 179)),
];

/// Resolve a colour name or `#rrggbb` hex string.
pub fn named_color(name: &str) -> Option<RGBColor> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = name.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, c)| *c)
}

pub fn resolve(name: &str) -> Result<RGBColor> {
    named_color(name).ok_or_else(|| ReportError::Render(format!("unknown colour '{name}'")))
}

pub fn resolve_all(names: &[String]) -> Result<Vec<RGBColor>> {
    names.iter().map(|n| resolve(n)).collect()
}

/// Resolve a palette that must hold at least one colour.
pub fn resolve_palette(names: &[String]) -> Result<Vec<RGBColor>> {
    if names.is_empty() {
        return Err(ReportError::Config("palette has no colours".to_string()));
    }
    resolve_all(names)
}

/// Repeat `palette` until it covers `n` slices.
pub fn cycle(palette: &[RGBColor], n: usize) -> Vec<RGBColor> {
    if palette.is_empty() {
        return Vec::new();
    }
    palette.iter().copied().cycle().take(n).collect()
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
