//! Color parsing utilities
//!
//! Hex color strings from the config file.

/// Parse RRGGBB or short RGB hex (leading '#' optional) to bytes
///
/// Returns None on invalid input.
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let digit = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).ok();
    match hex.len() {
        6 => Some([digit(0, 2)?, digit(2, 2)?, digit(4, 2)?]),
        // Short format: expand F -> FF
        3 => Some([digit(0, 1)? * 17, digit(1, 1)? * 17, digit(2, 1)? * 17]),
        _ => None,
    }
}

/// Parse hex color to normalized RGB (0.0-1.0)
/// Returns black on invalid input.
pub fn parse_hex_color_to_f32(hex: &str) -> (f32, f32, f32) {
    match parse_hex_color(hex) {
        Some([r, g, b]) => (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0),
        None => (0.0, 0.0, 0.0),
    }
}

/// Parse hex color to [f32; 4] RGBA (alpha = 1.0)
/// Returns white on invalid input.
pub fn parse_hex_color_to_rgba(hex: &str) -> [f32; 4] {
    match parse_hex_color(hex) {
        Some([r, g, b]) => [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0],
        None => [1.0, 1.0, 1.0, 1.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("ff0000"), Some([255, 0, 0]));
        assert_eq!(parse_hex_color("#cc4d0d"), Some([204, 77, 13]));
        assert_eq!(parse_hex_color("f00"), Some([255, 0, 0]));
        assert_eq!(parse_hex_color(" #0f0 "), Some([0, 255, 0]));
        assert_eq!(parse_hex_color("invalid"), None);
        assert_eq!(parse_hex_color("ffff"), None);
        // Multi-byte input must not panic on slicing
        assert_eq!(parse_hex_color("aéé"), None);
    }

    #[test]
    fn test_invalid_falls_back() {
        assert_eq!(parse_hex_color_to_f32("nope"), (0.0, 0.0, 0.0));
        assert_eq!(parse_hex_color_to_rgba("12345"), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(parse_hex_color_to_rgba("#00ff00"), [0.0, 1.0, 0.0, 1.0]);
    }
}
