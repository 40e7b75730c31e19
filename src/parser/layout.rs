//! Glyph positioning for PDF pages.
//!
//! Walks a page's content stream, tracking the graphics and text state, and
//! emits one [`TextChar`] per shown glyph with its box in top-down page
//! coordinates.

use std::collections::HashMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::model::TextChar;

use super::fonts::{code_value, number, resolve, FontMetrics};
use super::options::ParseOptions;

/// Nesting limit for Form XObjects drawn inside other forms.
const MAX_FORM_DEPTH: usize = 8;

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}

impl Matrix {
    fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6].iter().filter_map(number).collect();
        (n.len() == 6).then(|| Self::new(n[0], n[1], n[2], n[3], n[4], n[5]))
    }

    /// `self` applied first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }
}

/// Text state parameters (PDF 32000-1, 9.3).
#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
}

/// Page box in user space: `[x0 y0 x1 y1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MediaBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl MediaBox {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

impl Default for MediaBox {
    fn default() -> Self {
        // US Letter
        Self {
            x0: 0.0,
            y0: 0.0,
            x1: 612.0,
            y1: 792.0,
        }
    }
}

/// Fonts and XObjects visible to one content stream.
pub(crate) struct Resources<'a> {
    fonts: HashMap<Vec<u8>, FontMetrics<'a>>,
    xobjects: Option<&'a Dictionary>,
}

impl<'a> Resources<'a> {
    pub fn new(fonts: HashMap<Vec<u8>, FontMetrics<'a>>, xobjects: Option<&'a Dictionary>) -> Self {
        Self { fonts, xobjects }
    }

    /// Read `/Font` and `/XObject` from a resource dictionary.
    pub fn from_dict(doc: &'a LopdfDocument, dict: &'a Dictionary, fallback_width: f32) -> Self {
        let fonts: HashMap<Vec<u8>, FontMetrics<'a>> = dict
            .get(b"Font")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .map(|fonts| {
                fonts
                    .iter()
                    .filter_map(|(name, obj)| {
                        let font = resolve(doc, obj).as_dict().ok()?;
                        Some((name.clone(), FontMetrics::from_dict(doc, font, fallback_width)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let xobjects = dict
            .get(b"XObject")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok());

        Self { fonts, xobjects }
    }
}

/// Extracts positioned glyphs from one page's content stream.
pub(crate) struct GlyphExtractor<'a> {
    doc: &'a LopdfDocument,
    media_box: MediaBox,
    options: &'a ParseOptions,
}

impl<'a> GlyphExtractor<'a> {
    pub fn new(doc: &'a LopdfDocument, media_box: MediaBox, options: &'a ParseOptions) -> Self {
        Self {
            doc,
            media_box,
            options,
        }
    }

    /// Decode the content stream and position every shown glyph, following
    /// Form XObjects drawn with `Do`.
    pub fn extract(&self, content: &[u8], resources: &Resources<'a>) -> Result<Vec<TextChar>> {
        let mut chars = Vec::new();
        self.run(content, resources, GraphicsState::default(), 0, &mut chars)?;
        Ok(chars)
    }

    fn run(
        &self,
        content: &[u8],
        resources: &Resources<'a>,
        mut state: GraphicsState,
        depth: usize,
        chars: &mut Vec<TextChar>,
    ) -> Result<()> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut stack: Vec<GraphicsState> = Vec::new();
        let mut tm = Matrix::default();
        let mut tlm = Matrix::default();

        for op in &content.operations {
            let operands = op.operands.as_slice();
            match op.operator.as_str() {
                "q" => stack.push(state.clone()),
                "Q" => {
                    if let Some(saved) = stack.pop() {
                        state = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        state.ctm = m.then(&state.ctm);
                    }
                }
                "BT" => {
                    tm = Matrix::default();
                    tlm = Matrix::default();
                }
                "ET" => {}
                "Tf" => {
                    if let [Object::Name(font), size, ..] = operands {
                        state.text.font = font.clone();
                        state.text.size = number(size).unwrap_or(12.0);
                    }
                }
                "Tc" => set_number(operands, &mut state.text.char_spacing),
                "Tw" => set_number(operands, &mut state.text.word_spacing),
                "TL" => set_number(operands, &mut state.text.leading),
                "Ts" => set_number(operands, &mut state.text.rise),
                "Tz" => {
                    if let Some(scale) = operands.first().and_then(number) {
                        state.text.horizontal_scale = scale / 100.0;
                    }
                }
                "Td" | "TD" => {
                    if let [tx, ty, ..] = operands {
                        let tx = number(tx).unwrap_or(0.0);
                        let ty = number(ty).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.text.leading = -ty;
                        }
                        tlm = Matrix::translation(tx, ty).then(&tlm);
                        tm = tlm;
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        tlm = m;
                        tm = m;
                    }
                }
                "T*" => {
                    tlm = Matrix::translation(0.0, -state.text.leading).then(&tlm);
                    tm = tlm;
                }
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        self.show(bytes, resources, &state, &mut tm, chars);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        for item in items {
                            match item {
                                Object::String(bytes, _) => {
                                    self.show(bytes, resources, &state, &mut tm, chars)
                                }
                                other => {
                                    // Adjustments are in 1/1000 text space units;
                                    // positive values move left.
                                    if let Some(adjust) = number(other) {
                                        let tx = -adjust / 1000.0
                                            * state.text.size
                                            * state.text.horizontal_scale;
                                        tm = Matrix::translation(tx, 0.0).then(&tm);
                                    }
                                }
                            }
                        }
                    }
                }
                "'" | "\"" => {
                    let text_idx = if op.operator == "\"" {
                        if let [aw, ac, ..] = operands {
                            state.text.word_spacing = number(aw).unwrap_or(0.0);
                            state.text.char_spacing = number(ac).unwrap_or(0.0);
                        }
                        2
                    } else {
                        0
                    };
                    tlm = Matrix::translation(0.0, -state.text.leading).then(&tlm);
                    tm = tlm;
                    if let Some(Object::String(bytes, _)) = operands.get(text_idx) {
                        self.show(bytes, resources, &state, &mut tm, chars);
                    }
                }
                "Do" => {
                    if let Some(Object::Name(name)) = operands.first() {
                        self.draw_form(name, resources, &state, depth, chars)?;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Run a Form XObject's content with the form matrix applied. Image
    /// XObjects and unknown names draw nothing.
    fn draw_form(
        &self,
        name: &[u8],
        resources: &Resources<'a>,
        state: &GraphicsState,
        depth: usize,
        chars: &mut Vec<TextChar>,
    ) -> Result<()> {
        let Some(Object::Stream(form)) = resources
            .xobjects
            .and_then(|x| x.get(name).ok())
            .map(|o| resolve(self.doc, o))
        else {
            return Ok(());
        };

        let is_form = form
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| n == b"Form")
            .unwrap_or(false);
        if !is_form {
            return Ok(());
        }
        if depth >= MAX_FORM_DEPTH {
            log::warn!("Form XObject nesting deeper than {}; skipped", MAX_FORM_DEPTH);
            return Ok(());
        }

        let matrix = form
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|o| resolve(self.doc, o).as_array().ok())
            .and_then(|m| Matrix::from_operands(m))
            .unwrap_or_default();

        let mut form_state = state.clone();
        form_state.ctm = matrix.then(&state.ctm);

        // A form without /Resources uses the ones it is drawn with.
        let own = form
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|o| resolve(self.doc, o).as_dict().ok())
            .map(|dict| Resources::from_dict(self.doc, dict, self.options.fallback_width));

        let content = form
            .decompressed_content()
            .unwrap_or_else(|_| form.content.clone());
        self.run(
            &content,
            own.as_ref().unwrap_or(resources),
            form_state,
            depth + 1,
            chars,
        )
    }

    /// Emit glyphs for one shown string and advance the text matrix.
    fn show(
        &self,
        bytes: &[u8],
        resources: &Resources<'a>,
        state: &GraphicsState,
        tm: &mut Matrix,
        out: &mut Vec<TextChar>,
    ) {
        let text_state = &state.text;
        let fallback;
        let font = match resources.fonts.get(&text_state.font) {
            Some(font) => font,
            None => {
                fallback = FontMetrics::fallback(&text_state.font, self.options.fallback_width);
                &fallback
            }
        };

        let codes = font.codes(bytes);
        let texts = font.decode(self.doc, &codes);
        let th = text_state.horizontal_scale;

        for (code, text) in codes.iter().zip(texts) {
            let glyph_width = font.width(code_value(code)) / 1000.0;

            let trm = Matrix::new(
                text_state.size * th,
                0.0,
                0.0,
                text_state.size,
                0.0,
                text_state.rise,
            )
            .then(tm)
            .then(&state.ctm);

            if !text.is_empty() {
                out.push(self.positioned(text, &trm, glyph_width, &font.base_font));
            }

            let is_word_space = !font.two_byte && code_value(code) == u32::from(b' ');
            let spacing = text_state.char_spacing
                + if is_word_space {
                    text_state.word_spacing
                } else {
                    0.0
                };
            let tx = (glyph_width * text_state.size + spacing) * th;
            *tm = Matrix::translation(tx, 0.0).then(tm);
        }
    }

    fn positioned(&self, text: String, trm: &Matrix, glyph_width: f32, font_name: &str) -> TextChar {
        let size = (trm.c * trm.c + trm.d * trm.d).sqrt();
        let origin_x = trm.e - self.media_box.x0;
        let end_x = origin_x + glyph_width * trm.a;
        let baseline = trm.f;

        TextChar {
            text,
            x0: origin_x.min(end_x),
            x1: origin_x.max(end_x),
            top: self.media_box.y1 - (baseline + self.options.ascent * size),
            bottom: self.media_box.y1 - (baseline - self.options.descent * size),
            size,
            font_name: font_name.to_string(),
        }
    }
}

fn set_number(operands: &[Object], target: &mut f32) {
    if let Some(value) = operands.first().and_then(number) {
        *target = value;
    }
}
