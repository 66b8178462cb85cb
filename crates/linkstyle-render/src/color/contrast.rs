//! WCAG contrast math and the three correction methods.

use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::rgba::{blend_over, hex_to_rgba, Rgb, Rgba};
use crate::error::UnknownContrastMethod;

/// Contrast ratio aimed for by [`ContrastMethod::Full`] (WCAG AA body text).
pub const DEFAULT_TARGET_RATIO: f64 = 4.5;

const SEARCH_ITERATIONS: usize = 20;
const RATIO_TOLERANCE: f64 = 0.01;
const INTERVAL_TOLERANCE: f64 = 1e-4;

// Literal heuristic constants of the simple method.
const SIMPLE_DARK_FACTOR: f64 = 0.6;
const SIMPLE_LIGHT_FACTOR: f64 = 1.67;
const SIMPLE_BOUND: f64 = 80.0;

/// Canvas the editor paints under translucent backgrounds in dark theme.
const DARK_CANVAS: Rgb = Rgb::new(25.0, 25.0, 25.0);
const LUMINANCE_THRESHOLD: f64 = 0.5;

// ─── Polarity & method ──────────────────────────────────────────────────────

/// Whether the surface a color sits on is light or dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Light,
    Dark,
}

impl Polarity {
    /// The pure reference surface contrast is measured against.
    pub fn reference_surface(self) -> Rgb {
        match self {
            Polarity::Light => Rgb::WHITE,
            Polarity::Dark => Rgb::BLACK,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Light => write!(f, "light"),
            Polarity::Dark => write!(f, "dark"),
        }
    }
}

/// How foreground colors are corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastMethod {
    /// HSL lightness search toward the target ratio.
    #[default]
    Full,
    /// Fixed per-channel push away from the surface.
    Simple,
    /// Pass-through.
    None,
}

impl fmt::Display for ContrastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContrastMethod::Full => write!(f, "full"),
            ContrastMethod::Simple => write!(f, "simple"),
            ContrastMethod::None => write!(f, "none"),
        }
    }
}

impl FromStr for ContrastMethod {
    type Err = UnknownContrastMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(ContrastMethod::Full),
            "simple" => Ok(ContrastMethod::Simple),
            "none" => Ok(ContrastMethod::None),
            other => Err(UnknownContrastMethod(other.to_string())),
        }
    }
}

// ─── Luminance & contrast ───────────────────────────────────────────────────

/// Converts an sRGB channel (0–255) to linear light (0.0–1.0).
pub fn srgb_to_linear(c: f64) -> f64 {
    let c = c / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of an opaque color.
pub fn relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * srgb_to_linear(rgb.r) + 0.7152 * srgb_to_linear(rgb.g) + 0.0722 * srgb_to_linear(rgb.b)
}

/// WCAG contrast ratio; always brighter over darker, so never below 1.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

// ─── HSL ────────────────────────────────────────────────────────────────────

/// Converts to `(hue in degrees, saturation, lightness)`.
pub fn rgb_to_hsl(rgb: Rgb) -> (f64, f64, f64) {
    let r = rgb.r / 255.0;
    let g = rgb.g / 255.0;
    let b = rgb.b / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;

    if d == 0.0 {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let mut h = if max == r {
        ((g - b) / d) % 6.0
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    h *= 60.0;
    if h < 0.0 {
        h += 360.0;
    }
    (h, s, l)
}

/// Six-sector HSL to RGB, channels rounded to whole numbers.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r1, g1, b1) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };
    Rgb::new(to_channel(r1 + m), to_channel(g1 + m), to_channel(b1 + m))
}

fn to_channel(v: f64) -> f64 {
    let c = (v * 255.0).round();
    // Keeps a rounding residue from printing as "-0".
    if c <= 0.0 {
        0.0
    } else {
        c
    }
}

// ─── Correction methods ─────────────────────────────────────────────────────

/// Moves `fg` along the lightness axis until it reaches `target` contrast
/// against the pure reference surface of `polarity`.
///
/// Returns `fg` untouched when it already meets the target. Otherwise hue and
/// saturation stay fixed and lightness is binary-searched: downward within
/// `[0, L_orig]` on light surfaces (never brighter than the input), upward
/// within `[0, 1]` on dark ones. The best candidate is returned even when the
/// target is unreachable.
pub fn adjust_for_contrast(fg: Rgba, polarity: Polarity, target: f64) -> Rgba {
    let surface = polarity.reference_surface();
    let initial = contrast_ratio(blend_over(surface, fg), surface);
    if initial >= target {
        return fg;
    }

    let (h, s, l_orig) = rgb_to_hsl(fg.rgb());
    let mut low = 0.0;
    let mut high = match polarity {
        Polarity::Light => l_orig,
        Polarity::Dark => 1.0,
    };
    let mut best_l = l_orig;
    let mut best_ratio = initial;

    for _ in 0..SEARCH_ITERATIONS {
        let mid = (low + high) / 2.0;
        let candidate = hsl_to_rgb(h, s, mid).with_alpha(fg.a);
        let ratio = contrast_ratio(blend_over(surface, candidate), surface);

        if (ratio - target).abs() < (best_ratio - target).abs() || ratio >= target {
            best_l = mid;
            best_ratio = ratio;
        }

        if (ratio - target).abs() < RATIO_TOLERANCE || (high - low).abs() < INTERVAL_TOLERANCE {
            break;
        }

        // Short of the target: move away from the surface. Past it: move back
        // toward the original to keep the change minimal.
        match (polarity, ratio < target) {
            (Polarity::Light, true) => high = mid,
            (Polarity::Light, false) => low = mid,
            (Polarity::Dark, true) => low = mid,
            (Polarity::Dark, false) => high = mid,
        }
    }

    hsl_to_rgb(h, s, best_l).with_alpha(fg.a)
}

/// The cheap heuristic: on dark surfaces channels below 80 are scaled by 0.6,
/// on light surfaces channels above 175 have their distance from 255 scaled
/// by 1.67.
pub fn simple_adjust(fg: Rgba, polarity: Polarity) -> Rgba {
    let push = |c: f64| match polarity {
        Polarity::Dark if c < SIMPLE_BOUND => c * SIMPLE_DARK_FACTOR,
        Polarity::Light if c > 255.0 - SIMPLE_BOUND => 255.0 - (255.0 - c) * SIMPLE_LIGHT_FACTOR,
        _ => c,
    };
    Rgba::new(push(fg.r), push(fg.g), push(fg.b), fg.a)
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Color correction settings shared by every styler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastEngine {
    pub method: ContrastMethod,
    pub target_ratio: f64,
    /// When false every method behaves like [`ContrastMethod::None`].
    pub enabled: bool,
}

impl Default for ContrastEngine {
    fn default() -> Self {
        Self {
            method: ContrastMethod::Full,
            target_ratio: DEFAULT_TARGET_RATIO,
            enabled: true,
        }
    }
}

impl ContrastEngine {
    /// Corrects `hex` with the configured method.
    pub fn process(&self, hex: &str, polarity: Polarity) -> Option<String> {
        self.process_with(hex, polarity, self.method)
    }

    /// Corrects `hex` with an explicit method and returns a CSS `rgba()` value.
    ///
    /// Returns `None` for malformed hex, meaning "leave the original styling".
    pub fn process_with(
        &self,
        hex: &str,
        polarity: Polarity,
        method: ContrastMethod,
    ) -> Option<String> {
        let rgba = hex_to_rgba(hex)?;

        let adjusted = match method {
            _ if !self.enabled => rgba,
            ContrastMethod::None => rgba,
            ContrastMethod::Full => adjust_for_contrast(rgba, polarity, self.target_ratio),
            ContrastMethod::Simple => simple_adjust(rgba, polarity),
        };

        if adjusted != rgba {
            info!(
                "adjusted color #{} {} to {} for {} background using {} method",
                hex,
                rgba.to_css(),
                adjusted.to_css(),
                polarity,
                method
            );
        }

        Some(adjusted.to_css())
    }
}

/// [`ContrastEngine::process_with`] on the default engine (target 4.5).
pub fn process_rgb(hex: &str, polarity: Polarity, method: ContrastMethod) -> Option<String> {
    ContrastEngine::default().process_with(hex, polarity, method)
}

/// Classifies a (possibly translucent) background as light or dark.
///
/// The color is composited over the theme's canvas (white in light theme,
/// `#191919` in dark) and its luminance compared against 0.5. Malformed hex
/// falls back to the theme's own polarity.
pub fn evaluate_background(hex: &str, is_dark_theme: bool) -> Polarity {
    let theme = if is_dark_theme {
        Polarity::Dark
    } else {
        Polarity::Light
    };
    let Some(background) = hex_to_rgba(hex) else {
        return theme;
    };

    let canvas = if is_dark_theme { DARK_CANVAS } else { Rgb::WHITE };
    let luminance = relative_luminance(blend_over(canvas, background));
    let polarity = if luminance > LUMINANCE_THRESHOLD {
        Polarity::Light
    } else {
        Polarity::Dark
    };

    debug!(
        "evaluated background #{} as {} (luminance: {:.3})",
        hex, polarity, luminance
    );
    polarity
}
