//! Page color mode detection.
//!
//! The editor marks its dark theme either with a `dark` class on `<body>` or
//! with a `.notion-dark-theme` element somewhere in the page. Detection is a
//! plain query on the [`Document`]; the scanner compares the result against
//! the mode it saw last and resets its state when they differ.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Polarity;
use crate::dom::Document;

/// The page's color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Light mode (light background, dark text).
    #[default]
    Light,
    /// Dark mode (dark background, light text).
    Dark,
}

impl ColorMode {
    pub fn is_dark(self) -> bool {
        self == ColorMode::Dark
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Light => write!(f, "Light"),
            ColorMode::Dark => write!(f, "Dark"),
        }
    }
}

impl From<ColorMode> for Polarity {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => Polarity::Light,
            ColorMode::Dark => Polarity::Dark,
        }
    }
}

const DARK_BODY_CLASS: &str = "dark";
const DARK_THEME_CLASS: &str = "notion-dark-theme";

/// Reads the color mode the page is currently rendered in.
pub fn detect_color_mode(doc: &Document) -> ColorMode {
    let body = doc.body();
    let dark = doc.has_class(body, DARK_BODY_CLASS)
        || doc
            .descendants(doc.root())
            .any(|id| doc.has_class(id, DARK_THEME_CLASS));

    if dark {
        ColorMode::Dark
    } else {
        ColorMode::Light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_page_is_light() {
        let doc = Document::parse("<div class=\"notion-page-content\"></div>").unwrap();
        assert_eq!(detect_color_mode(&doc), ColorMode::Light);
    }

    #[test]
    fn dark_body_class() {
        let doc = Document::parse("<html><head></head><body class=\"dark\"></body></html>")
            .unwrap();
        assert_eq!(detect_color_mode(&doc), ColorMode::Dark);
    }

    #[test]
    fn dark_theme_marker_anywhere() {
        let doc = Document::parse(
            "<div><section><div class=\"notion-app notion-dark-theme\"></div></section></div>",
        )
        .unwrap();
        assert_eq!(detect_color_mode(&doc), ColorMode::Dark);
    }

    #[test]
    fn mode_maps_to_polarity() {
        assert_eq!(Polarity::from(ColorMode::Dark), Polarity::Dark);
        assert_eq!(Polarity::from(ColorMode::Light), Polarity::Light);
    }
}
