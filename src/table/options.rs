//! Layout inference options.

use crate::model::WordOptions;

/// Tolerances and vendor constants used to find the salary table on a page.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Glyph-to-word grouping tolerances
    pub words: WordOptions,

    /// Vertical tolerance when clustering words into table rows
    pub row_tolerance: f32,

    /// Minimum gap between distinct glyph x0 values that marks a column gutter
    pub min_gutter_width: f32,

    /// First report year using the header-on-first-page-only layout
    pub modern_layout_year: i32,

    /// Words preceding the data on page 1 of a modern-layout report
    pub modern_header_words: usize,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set glyph-to-word tolerances.
    pub fn with_word_options(mut self, words: WordOptions) -> Self {
        self.words = words;
        self
    }

    /// Set the row clustering tolerance.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.row_tolerance = tolerance;
        self
    }

    /// Set the minimum gutter width.
    pub fn with_min_gutter_width(mut self, width: f32) -> Self {
        self.min_gutter_width = width;
        self
    }

    /// Set the first year of the modern layout.
    pub fn with_modern_layout_year(mut self, year: i32) -> Self {
        self.modern_layout_year = year;
        self
    }

    /// Set the number of header words on page 1 of modern reports.
    pub fn with_modern_header_words(mut self, count: usize) -> Self {
        self.modern_header_words = count;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            words: WordOptions::default(),
            row_tolerance: 1.0,
            min_gutter_width: 10.0,
            modern_layout_year: 2019,
            modern_header_words: 22,
        }
    }
}
