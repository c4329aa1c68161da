//! Theme definitions for colors, symbols, and badges.

use owo_colors::{OwoColorize, Style};

/// Symbol pair for ASCII and Unicode variants.
#[derive(Debug, Clone, Copy)]
pub struct SymbolPair {
    pub ascii: &'static str,
    pub unicode: &'static str,
}

impl SymbolPair {
    pub const fn new(ascii: &'static str, unicode: &'static str) -> Self {
        Self { ascii, unicode }
    }

    /// Get the appropriate symbol based on unicode flag.
    pub fn get(&self, unicode: bool) -> &'static str {
        if unicode {
            self.unicode
        } else {
            self.ascii
        }
    }
}

/// Glyphs used by the report renderers.
pub mod symbols {
    use super::SymbolPair;

    pub const BAR_FULL: SymbolPair = SymbolPair::new("#", "\u{2588}"); // █
    pub const BAR_EMPTY: SymbolPair = SymbolPair::new("-", "\u{2591}"); // ░
    pub const RULE: SymbolPair = SymbolPair::new("-", "\u{2500}"); // ─
    pub const DOUBLE_RULE: SymbolPair = SymbolPair::new("=", "\u{2550}"); // ═
    pub const AXIS: SymbolPair = SymbolPair::new("|", "\u{2502}"); // │
    pub const AXIS_CORNER: SymbolPair = SymbolPair::new("+", "\u{2514}"); // └
    pub const ARROW: SymbolPair = SymbolPair::new("->", "\u{2192}"); // →
    pub const UP: SymbolPair = SymbolPair::new("^", "\u{2191}"); // ↑
    pub const DOWN: SymbolPair = SymbolPair::new("v", "\u{2193}"); // ↓
}

/// Direction arrow for a signed change.
pub fn trend_arrow(change: f64, unicode: bool) -> &'static str {
    if change < 0.0 {
        symbols::DOWN.get(unicode)
    } else if change > 0.0 {
        symbols::UP.get(unicode)
    } else {
        symbols::ARROW.get(unicode)
    }
}

/// Badge types for status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
    Err,
    Info,
}

impl Badge {
    /// Get badge with symbol for display.
    pub fn display(&self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Self::Ok, true) => "[\u{2713}]",   // [✓]
            (Self::Warn, true) => "[\u{26A0}]", // [⚠]
            (Self::Err, true) => "[\u{2717}]",  // [✗]
            (Self::Info, true) => "[\u{2139}]", // [ℹ]
            (Self::Ok, false) => "[OK]",
            (Self::Warn, false) => "[WARN]",
            (Self::Err, false) => "[ERR]",
            (Self::Info, false) => "[INFO]",
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Self::Ok => Style::new().green(),
            Self::Warn => Style::new().yellow(),
            Self::Err => Style::new().red(),
            Self::Info => Style::new().cyan(),
        }
    }
}

/// Shared text styles.
pub mod styles {
    use owo_colors::Style;

    pub fn bold() -> Style {
        Style::new().bold()
    }

    pub fn dim() -> Style {
        Style::new().dimmed()
    }
}

/// Apply `style` when color is enabled; otherwise return the text unchanged.
pub fn styled(text: &str, style: Style, enabled: bool) -> String {
    if enabled {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_display_ascii() {
        assert_eq!(Badge::Ok.display(false), "[OK]");
        assert_eq!(Badge::Err.display(false), "[ERR]");
    }

    #[test]
    fn test_badge_display_unicode() {
        assert_eq!(Badge::Ok.display(true), "[\u{2713}]");
    }

    #[test]
    fn test_symbol_pair() {
        assert_eq!(symbols::BAR_FULL.get(false), "#");
        assert_eq!(symbols::BAR_FULL.get(true), "\u{2588}");
    }

    #[test]
    fn test_trend_arrow() {
        assert_eq!(trend_arrow(-0.4, true), "\u{2193}");
        assert_eq!(trend_arrow(1.0, true), "\u{2191}");
        assert_eq!(trend_arrow(0.0, false), "->");
    }

    #[test]
    fn test_styled_respects_color_flag() {
        assert_eq!(styled("Vitals", styles::bold(), false), "Vitals");
        let colored = styled("Vitals", styles::bold(), true);
        assert!(colored.contains("Vitals"));
        assert_ne!(colored, "Vitals");
    }
}
