//! Advance widths of the standard 14 fonts, used when a simple font omits
//! `/Widths`.
//!
//! Tables cover the printable ASCII range (codes 32..=126) in 1/1000 em.
//! Symbol and ZapfDingbats are not covered.

/// First code in every table.
const FIRST_CODE: u32 = 32;

/// Courier and its styles are monospaced.
const COURIER_WIDTH: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Base14 {
    Courier,
    Helvetica,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
}

impl Base14 {
    /// Match a `/BaseFont` name, ignoring a subset tag (`ABCDEF+`), case and
    /// punctuation.
    pub fn from_base_font(name: &str) -> Option<Self> {
        let name = match name.split_once('+') {
            Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => {
                rest
            }
            _ => name,
        };
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if normalized.starts_with("courier") {
            return Some(Self::Courier);
        }
        if normalized.starts_with("helvetica") || normalized.starts_with("arial") {
            return Some(Self::Helvetica);
        }
        match normalized.as_str() {
            "timesroman" | "timesnewroman" | "timesnewromanpsmt" => Some(Self::TimesRoman),
            "timesbold" | "timesnewromanbold" | "timesnewromanpsboldmt" => Some(Self::TimesBold),
            "timesitalic" | "timesnewromanitalic" | "timesnewromanpsitalicmt" => {
                Some(Self::TimesItalic)
            }
            "timesbolditalic" | "timesnewromanbolditalic" | "timesnewromanpsbolditalicmt" => {
                Some(Self::TimesBoldItalic)
            }
            _ => None,
        }
    }

    /// Advance width of a single-byte code, if the table covers it.
    pub fn width(self, code: u32) -> Option<f32> {
        let table = match self {
            Self::Courier => {
                return (FIRST_CODE..=126).contains(&code).then_some(COURIER_WIDTH);
            }
            Self::Helvetica => &HELVETICA,
            Self::TimesRoman => &TIMES_ROMAN,
            Self::TimesBold => &TIMES_BOLD,
            Self::TimesItalic => &TIMES_ITALIC,
            Self::TimesBoldItalic => &TIMES_BOLD_ITALIC,
        };
        code.checked_sub(FIRST_CODE)
            .and_then(|i| table.get(i as usize))
            .map(|&w| f32::from(w))
    }
}

const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584,
    278, 333, 278, 278, 556, 556, 556, 556, 556, 556, 556, 556,
    556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722,
    722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278,
    278, 278, 469, 556, 222, 556, 556, 500, 556, 556, 278, 556,
    556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564,
    250, 333, 250, 278, 500, 500, 500, 500, 500, 500, 500, 500,
    500, 500, 278, 278, 564, 564, 564, 444, 921, 722, 667, 667,
    722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333,
    278, 333, 469, 500, 333, 444, 500, 444, 500, 444, 333, 500,
    500, 278, 278, 500, 278, 778, 500, 500, 500, 500, 333, 389,
    278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570,
    250, 333, 250, 278, 500, 500, 500, 500, 500, 500, 500, 500,
    500, 500, 333, 333, 570, 570, 570, 500, 930, 722, 667, 722,
    722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333,
    278, 333, 581, 500, 333, 500, 556, 444, 556, 444, 333, 500,
    556, 278, 333, 556, 278, 833, 556, 500, 556, 556, 444, 389,
    333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675,
    250, 333, 250, 278, 500, 500, 500, 500, 500, 500, 500, 500,
    500, 500, 333, 333, 675, 675, 675, 500, 920, 611, 611, 667,
    722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389,
    278, 389, 422, 500, 333, 500, 500, 444, 500, 444, 278, 500,
    500, 278, 278, 444, 278, 722, 500, 500, 500, 500, 389, 389,
    278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

const TIMES_BOLD_ITALIC: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570,
    250, 333, 250, 278, 500, 500, 500, 500, 500, 500, 500, 500,
    500, 500, 333, 333, 570, 570, 570, 500, 832, 667, 667, 667,
    722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333,
    278, 333, 570, 500, 333, 500, 500, 444, 500, 444, 333, 500,
    556, 278, 278, 500, 278, 778, 556, 500, 500, 500, 389, 389,
    278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
];
