//! Page-level types: positioned glyphs, words, and page views.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::BBox;

/// A single glyph with its position on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChar {
    /// Decoded text of the glyph (usually one char)
    pub text: String,
    /// Left edge (glyph origin)
    pub x0: f32,
    /// Right edge (origin plus advance width)
    pub x1: f32,
    /// Top edge, measured from the top of the page
    pub top: f32,
    /// Bottom edge, measured from the top of the page
    pub bottom: f32,
    /// Effective font size in points
    pub size: f32,
    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextChar {
    /// Bounding box of the glyph.
    pub fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.top, self.x1, self.bottom)
    }

    /// Whether the glyph is whitespace and therefore separates words.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    /// Horizontal midpoint.
    pub fn mid_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Vertical midpoint.
    pub fn mid_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

/// A run of adjacent non-blank glyphs on one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub x0: f32,
    pub x1: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Word {
    fn from_chars(chars: &[&TextChar]) -> Option<Self> {
        let bbox = BBox::enclosing(chars.iter().map(|c| c.bbox()))?;
        Some(Self {
            text: chars.iter().map(|c| c.text.as_str()).collect(),
            x0: bbox.x0,
            x1: bbox.x1,
            top: bbox.top,
            bottom: bbox.bottom,
        })
    }

    /// Bounding box of the word.
    pub fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.top, self.x1, self.bottom)
    }
}

/// Tolerances used when grouping glyphs into words.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordOptions {
    /// Maximum horizontal gap between glyphs of the same word
    pub x_tolerance: f32,
    /// Maximum vertical drift between glyphs of the same line
    pub y_tolerance: f32,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// A page, or a cropped view of one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Glyphs on the page, in content stream order
    pub chars: Vec<TextChar>,

    bbox: BBox,
}

impl Page {
    /// Create a new page with the given dimensions and glyphs.
    pub fn new(number: u32, width: f32, height: f32, chars: Vec<TextChar>) -> Self {
        Self {
            number,
            width,
            height,
            chars,
            bbox: BBox::new(0.0, 0.0, width, height),
        }
    }

    /// Region covered by this view. The full page for an uncropped page.
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// A view holding only the glyphs fully inside `bbox`.
    ///
    /// Coordinates are kept in page space, not shifted to the crop origin.
    pub fn within_bbox(&self, bbox: BBox) -> Page {
        Page {
            number: self.number,
            width: self.width,
            height: self.height,
            chars: self
                .chars
                .iter()
                .filter(|c| bbox.contains(&c.bbox()))
                .cloned()
                .collect(),
            bbox,
        }
    }

    /// Group glyphs into words, line by line from the top, left to right.
    pub fn extract_words(&self, options: &WordOptions) -> Vec<Word> {
        let refs: Vec<&TextChar> = self.chars.iter().collect();
        words_from_chars(&refs, options)
    }

    /// Text of the page: words joined by spaces, lines by newlines.
    pub fn extract_text(&self, options: &WordOptions) -> String {
        let refs: Vec<&TextChar> = self.chars.iter().collect();
        text_from_chars(&refs, options)
    }

    /// Whether the view holds no glyphs.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Cluster glyphs into lines by `top`, chaining neighbours within `tolerance`.
///
/// Lines are ordered top to bottom and each line left to right.
fn cluster_lines<'a>(chars: &[&'a TextChar], tolerance: f32) -> Vec<Vec<&'a TextChar>> {
    let mut sorted: Vec<&TextChar> = chars.to_vec();
    sorted.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(Ordering::Equal));

    let mut lines: Vec<Vec<&TextChar>> = Vec::new();
    let mut last_top: Option<f32> = None;
    for ch in sorted {
        match (last_top, lines.last_mut()) {
            (Some(top), Some(line)) if ch.top - top <= tolerance => line.push(ch),
            _ => lines.push(vec![ch]),
        }
        last_top = Some(ch.top);
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal));
    }
    lines
}

fn words_in_line(line: &[&TextChar], options: &WordOptions) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Vec<&TextChar> = Vec::new();

    for &ch in line {
        if ch.is_blank() {
            words.extend(Word::from_chars(&current));
            current.clear();
            continue;
        }
        if let Some(prev) = current.last() {
            let gap = ch.x0 - prev.x1;
            if gap > options.x_tolerance || (ch.top - prev.top).abs() > options.y_tolerance {
                words.extend(Word::from_chars(&current));
                current.clear();
            }
        }
        current.push(ch);
    }
    words.extend(Word::from_chars(&current));
    words
}

fn words_from_chars(chars: &[&TextChar], options: &WordOptions) -> Vec<Word> {
    cluster_lines(chars, options.y_tolerance)
        .iter()
        .flat_map(|line| words_in_line(line, options))
        .collect()
}

pub(crate) fn text_from_chars(chars: &[&TextChar], options: &WordOptions) -> String {
    cluster_lines(chars, options.y_tolerance)
        .iter()
        .map(|line| {
            words_in_line(line, options)
                .into_iter()
                .map(|w| w.text)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
