// ─── RGB / RGBA types ───────────────────────────────────────────────────────

/// An opaque color in 0–255 channel space.
///
/// Channels are `f64` because compositing and the simple contrast heuristic
/// produce fractional values that are emitted as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Attaches an alpha value.
    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }
}

/// A color with alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Drops the alpha channel.
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Renders as a CSS `rgba()` value.
    ///
    /// Numbers use the shortest representation that round-trips, so whole
    /// channels print without a fraction (`rgba(255, 0, 255, 1)`) and
    /// fractional ones keep every digit (`rgba(10.2, 10.2, 10.2, 1)`).
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

// ─── Decoding & compositing ─────────────────────────────────────────────────

fn hex_pair(hex: &str, at: usize) -> Option<f64> {
    let pair = hex.get(at..at + 2)?;
    u8::from_str_radix(pair, 16).ok().map(f64::from)
}

/// Decodes `RRGGBB` (alpha 1) or `RRGGBBA` (alpha `A / 16`).
///
/// Any other length, or a non-hex character, yields `None`.
pub fn hex_to_rgba(hex: &str) -> Option<Rgba> {
    // from_str_radix alone would accept a leading '+'.
    if !matches!(hex.len(), 6 | 7) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = hex_pair(hex, 0)?;
    let g = hex_pair(hex, 2)?;
    let b = hex_pair(hex, 4)?;
    let a = match hex.get(6..7) {
        Some(digit) => u8::from_str_radix(digit, 16).ok().map(f64::from)? / 16.0,
        None => 1.0,
    };
    Some(Rgba::new(r, g, b, a))
}

/// Composites `fg` over an opaque `bg`: `fg * a + bg * (1 - a)` per channel.
pub fn blend_over(bg: Rgb, fg: Rgba) -> Rgb {
    Rgb::new(
        fg.r * fg.a + bg.r * (1.0 - fg.a),
        fg.g * fg.a + bg.g * (1.0 - fg.a),
        fg.b * fg.a + bg.b * (1.0 - fg.a),
    )
}
