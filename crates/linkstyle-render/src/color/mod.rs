//! Color decoding and theme-aware contrast correction.
//!
//! Colors arrive from records as 6 or 7 hex digits (`RRGGBB` or `RRGGBBA`,
//! where the alpha digit is read as `digit / 16`). Before a foreground color is
//! written to the page it is checked against the surface it will sit on and,
//! when it is not readable enough, moved along the lightness axis until it
//! reaches the WCAG contrast target.
//!
//! ```rust
//! use linkstyle_render::color::{process_rgb, ContrastMethod, Polarity};
//!
//! // Already readable on white: passes through unchanged.
//! assert_eq!(
//!     process_rgb("101010", Polarity::Light, ContrastMethod::Full).as_deref(),
//!     Some("rgba(16, 16, 16, 1)")
//! );
//!
//! // Malformed hex is rejected; callers leave the original styling alone.
//! assert_eq!(process_rgb("12345", Polarity::Dark, ContrastMethod::Simple), None);
//! ```
//!
//! All math runs in 0–255 channel space with `f64` channels, so blended and
//! heuristically adjusted colors keep their fractional parts all the way into
//! the emitted `rgba()` string.

mod contrast;
mod rgba;

pub use contrast::{
    adjust_for_contrast, contrast_ratio, evaluate_background, hsl_to_rgb, process_rgb,
    relative_luminance, rgb_to_hsl, simple_adjust, srgb_to_linear, ContrastEngine,
    ContrastMethod, Polarity, DEFAULT_TARGET_RATIO,
};
pub use rgba::{blend_over, hex_to_rgba, Rgb, Rgba};
