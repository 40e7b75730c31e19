//! Parsing options and configuration.

/// Options for turning PDF pages into positioned glyphs.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Glyph ascent above the baseline, as a fraction of the font size
    pub ascent: f32,

    /// Glyph descent below the baseline, as a fraction of the font size
    pub descent: f32,

    /// Advance width (1/1000 em) for glyphs whose font carries no widths
    pub fallback_width: f32,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip invalid content).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set glyph ascent and descent as fractions of the font size.
    pub fn with_vertical_metrics(mut self, ascent: f32, descent: f32) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    /// Set the advance width used when a font has no width table.
    pub fn with_fallback_width(mut self, width: f32) -> Self {
        self.fallback_width = width;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            ascent: 0.8,
            descent: 0.2,
            fallback_width: 500.0,
        }
    }
}

/// Error handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Log and skip the failing page, then continue
    Lenient,
}
