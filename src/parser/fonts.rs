//! Font metrics needed to position individual glyphs.

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use super::base14::Base14;

/// Widths and decoding for one font resource.
#[derive(Debug, Clone)]
pub(crate) struct FontMetrics<'a> {
    dict: Option<&'a Dictionary>,
    /// Base font name (e.g., "Helvetica-Bold")
    pub base_font: String,
    /// Type0 fonts address glyphs with two-byte codes
    pub two_byte: bool,
    first_char: u32,
    widths: Vec<f32>,
    /// (first, last, width) runs from a CID font's /W array
    cid_widths: Vec<(u32, u32, f32)>,
    /// Built-in widths for a standard font declared without /Widths
    base14: Option<Base14>,
    missing_width: f32,
}

impl<'a> FontMetrics<'a> {
    /// Read metrics from a font dictionary.
    pub fn from_dict(doc: &'a LopdfDocument, dict: &'a Dictionary, fallback_width: f32) -> Self {
        let base_font = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| resolve(doc, o).as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let two_byte = dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| n == b"Type0")
            .unwrap_or(false);

        let mut metrics = Self {
            dict: Some(dict),
            base_font,
            two_byte,
            first_char: 0,
            widths: Vec::new(),
            cid_widths: Vec::new(),
            base14: None,
            missing_width: fallback_width,
        };

        if two_byte {
            metrics.read_cid_widths(doc, dict);
        } else {
            metrics.read_simple_widths(doc, dict);
        }
        metrics
    }

    /// Metrics for a font name that could not be resolved on the page.
    pub fn fallback(name: &[u8], fallback_width: f32) -> Self {
        Self {
            dict: None,
            base_font: String::from_utf8_lossy(name).to_string(),
            two_byte: false,
            first_char: 0,
            widths: Vec::new(),
            cid_widths: Vec::new(),
            base14: None,
            missing_width: fallback_width,
        }
    }

    fn read_simple_widths(&mut self, doc: &LopdfDocument, dict: &Dictionary) {
        self.first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| number(resolve(doc, o)))
            .map(|n| n as u32)
            .unwrap_or(0);

        if let Some(Object::Array(widths)) = dict.get(b"Widths").ok().map(|o| resolve(doc, o)) {
            self.widths = widths
                .iter()
                .map(|w| number(resolve(doc, w)).unwrap_or(0.0))
                .collect();
        }
        if self.widths.is_empty() {
            self.base14 = Base14::from_base_font(&self.base_font);
        }

        let missing = dict
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .and_then(|fd| fd.get(b"MissingWidth").ok())
            .and_then(|o| number(resolve(doc, o)));
        if let Some(w) = missing {
            self.missing_width = w;
        }
    }

    fn read_cid_widths(&mut self, doc: &LopdfDocument, dict: &Dictionary) {
        let descendant = dict
            .get(b"DescendantFonts")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .and_then(|arr| arr.first())
            .and_then(|o| resolve(doc, o).as_dict().ok());

        let Some(cid_font) = descendant else {
            return;
        };

        self.missing_width = cid_font
            .get(b"DW")
            .ok()
            .and_then(|o| number(resolve(doc, o)))
            .unwrap_or(1000.0);

        if let Some(Object::Array(w)) = cid_font.get(b"W").ok().map(|o| resolve(doc, o)) {
            self.cid_widths = parse_cid_widths(doc, w);
        }
    }

    /// Advance width of a glyph code in 1/1000 em.
    pub fn width(&self, code: u32) -> f32 {
        if self.two_byte {
            return self
                .cid_widths
                .iter()
                .find(|(first, last, _)| (*first..=*last).contains(&code))
                .map(|(_, _, w)| *w)
                .unwrap_or(self.missing_width);
        }

        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .or_else(|| self.base14.and_then(|font| font.width(code)))
            .unwrap_or(self.missing_width)
    }

    /// Split a shown string into glyph codes.
    pub fn codes<'b>(&self, bytes: &'b [u8]) -> Vec<&'b [u8]> {
        if self.two_byte {
            bytes.chunks(2).collect()
        } else {
            bytes.chunks(1).collect()
        }
    }

    /// Decode glyph codes to text, one string per code.
    pub fn decode(&self, doc: &LopdfDocument, codes: &[&[u8]]) -> Vec<String> {
        let encoding = self.dict.and_then(|d| d.get_font_encoding(doc).ok());
        codes
            .iter()
            .map(|code| {
                encoding
                    .as_ref()
                    .and_then(|enc| LopdfDocument::decode_text(enc, code).ok())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| decode_code_simple(code))
            })
            .collect()
    }
}

/// Numeric value of a glyph code.
pub(crate) fn code_value(code: &[u8]) -> u32 {
    code.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32)
}

/// Decode a glyph code without an encoding: two-byte codes as UCS-2,
/// single bytes as Latin-1.
fn decode_code_simple(code: &[u8]) -> String {
    match code {
        [hi, lo] => char::from_u32(u16::from_be_bytes([*hi, *lo]) as u32)
            .map(String::from)
            .unwrap_or_default(),
        _ => code.iter().map(|&b| b as char).collect(),
    }
}

fn parse_cid_widths(doc: &LopdfDocument, w: &[Object]) -> Vec<(u32, u32, f32)> {
    let mut runs = Vec::new();
    let mut i = 0;

    while i < w.len() {
        let Some(first) = number(resolve(doc, &w[i])).map(|n| n as u32) else {
            break;
        };
        match w.get(i + 1).map(|o| resolve(doc, o)) {
            // c [w1 w2 ...]
            Some(Object::Array(list)) => {
                for (k, width) in list.iter().enumerate() {
                    if let Some(width) = number(resolve(doc, width)) {
                        let code = first + k as u32;
                        runs.push((code, code, width));
                    }
                }
                i += 2;
            }
            // c_first c_last w
            Some(last) => {
                let last = number(last).map(|n| n as u32);
                let width = w.get(i + 2).and_then(|o| number(resolve(doc, o)));
                if let (Some(last), Some(width)) = (last, width) {
                    runs.push((first, last, width));
                }
                i += 3;
            }
            None => break,
        }
    }

    runs
}

/// Follow indirect references to the underlying object.
pub(crate) fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    let mut current = obj;
    // Bounded so a reference cycle cannot spin forever.
    for _ in 0..8 {
        match current {
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(next) => current = next,
                Err(_) => break,
            },
            _ => break,
        }
    }
    current
}

/// Helper to extract number from PDF object.
pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_simple_widths() {
        let doc = LopdfDocument::with_version("1.5");
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "FirstChar" => 65,
            "Widths" => vec![Object::Integer(600), Object::Integer(550)],
        };
        let font = FontMetrics::from_dict(&doc, &dict, 500.0);
        assert_eq!(font.base_font, "Courier");
        assert!(!font.two_byte);
        assert_eq!(font.width(65), 600.0);
        assert_eq!(font.width(66), 550.0);
        // Outside the table falls back.
        assert_eq!(font.width(67), 500.0);
        assert_eq!(font.width(32), 500.0);
    }

    #[test]
    fn test_standard_font_without_widths() {
        let doc = LopdfDocument::with_version("1.5");
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        };
        let font = FontMetrics::from_dict(&doc, &dict, 500.0);
        assert_eq!(font.width(u32::from(b'i')), 222.0);
        assert_eq!(font.width(u32::from(b'M')), 833.0);
        // Outside the built-in table.
        assert_eq!(font.width(200), 500.0);

        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Symbol",
        };
        let font = FontMetrics::from_dict(&doc, &dict, 500.0);
        assert_eq!(font.width(u32::from(b'M')), 500.0);
    }

    #[test]
    fn test_cid_width_runs() {
        let doc = LopdfDocument::with_version("1.5");
        let w = vec![
            Object::Integer(1),
            Object::Array(vec![Object::Integer(250), Object::Integer(300)]),
            Object::Integer(10),
            Object::Integer(20),
            Object::Integer(700),
        ];
        let runs = parse_cid_widths(&doc, &w);
        assert_eq!(runs, vec![(1, 1, 250.0), (2, 2, 300.0), (10, 20, 700.0)]);
    }

    #[test]
    fn test_type0_font_uses_two_byte_codes() {
        let doc = LopdfDocument::with_version("1.5");
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "Arial",
            "DescendantFonts" => vec![Object::Dictionary(dictionary! {
                "DW" => 900,
                "W" => vec![Object::Integer(36), Object::Array(vec![Object::Integer(667)])],
            })],
        };
        let font = FontMetrics::from_dict(&doc, &dict, 500.0);
        assert!(font.two_byte);
        assert_eq!(font.width(36), 667.0);
        assert_eq!(font.width(37), 900.0);
        assert_eq!(font.codes(&[0, 36, 0, 37]), vec![&[0u8, 36][..], &[0u8, 37][..]]);
    }

    #[test]
    fn test_code_value_and_simple_decode() {
        assert_eq!(code_value(&[0x41]), 0x41);
        assert_eq!(code_value(&[0x01, 0x02]), 0x0102);
        assert_eq!(decode_code_simple(&[0xE9]), "é");
        assert_eq!(decode_code_simple(&[0x00, 0x41]), "A");
    }

    #[test]
    fn test_fallback_font() {
        let font = FontMetrics::fallback(b"F9", 500.0);
        assert_eq!(font.base_font, "F9");
        assert_eq!(font.width(65), 500.0);
        assert_eq!(font.codes(b"AB").len(), 2);
    }
}
