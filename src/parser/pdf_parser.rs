//! PDF document parser using lopdf.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::pdf_version_from_path;
use crate::error::{Error, Result};
use crate::model::{Page, TextChar};

use super::fonts::{number, resolve, FontMetrics};
use super::layout::{GlyphExtractor, MediaBox, Resources};
use super::options::{ErrorMode, ParseOptions};

/// Maximum /Parent hops followed when looking up inherited page attributes.
const MAX_INHERIT_DEPTH: usize = 32;

/// PDF document parser producing positioned glyphs per page.
pub struct PdfParser {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let version = pdf_version_from_path(path)?;
        log::debug!("Opening {} (PDF {})", path.display(), version);

        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc, options)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        crate::detect::pdf_version_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc, options)
    }

    fn from_document(doc: LopdfDocument, options: ParseOptions) -> Result<Self> {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; glyph text may be unreadable");
        }
        let pages = doc.get_pages();
        Ok(Self {
            doc,
            pages,
            options,
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Extract one page (1-indexed).
    ///
    /// In lenient mode a page whose content cannot be decoded comes back
    /// empty instead of failing.
    pub fn page(&self, page_num: u32) -> Result<Page> {
        let page_id = *self
            .pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, self.page_count()))?;

        let media_box = self.media_box(page_id);
        let chars = match self.page_chars(page_id, media_box) {
            Ok(chars) => chars,
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Failed to extract glyphs from page {}: {}", page_num, e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        log::debug!("Page {}: {} glyphs", page_num, chars.len());
        Ok(Page::new(
            page_num,
            media_box.width(),
            media_box.height(),
            chars,
        ))
    }

    /// Extract every page, in order.
    pub fn pages(&self) -> Result<Vec<Page>> {
        self.pages.keys().map(|&n| self.page(n)).collect()
    }

    fn page_chars(&self, page_id: ObjectId, media_box: MediaBox) -> Result<Vec<TextChar>> {
        let page_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let fonts: HashMap<Vec<u8>, FontMetrics<'_>> = page_fonts
            .into_iter()
            .map(|(name, dict)| {
                let metrics = FontMetrics::from_dict(&self.doc, dict, self.options.fallback_width);
                (name, metrics)
            })
            .collect();

        let xobjects = self
            .inherited(page_id, b"Resources")
            .and_then(|r| r.as_dict().ok())
            .and_then(|r| r.get(b"XObject").ok())
            .and_then(|x| resolve(&self.doc, x).as_dict().ok());

        let content = self.page_content(page_id)?;
        let resources = Resources::new(fonts, xobjects);
        GlyphExtractor::new(&self.doc, media_box, &self.options).extract(&content, &resources)
    }

    /// Get page content stream, concatenating multi-part contents.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => resolve(&self.doc, contents),
            // A page without /Contents is blank.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            // Unfiltered streams fail to "decompress"; use their raw bytes.
            Object::Stream(s) => Ok(s
                .decompressed_content()
                .unwrap_or_else(|_| s.content.clone())),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Stream(s) = resolve(&self.doc, obj) {
                        let data = s.decompressed_content().unwrap_or_else(|_| s.content.clone());
                        content.extend_from_slice(&data);
                        content.push(b' ');
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Page /MediaBox, following /Parent inheritance. Defaults to Letter.
    fn media_box(&self, page_id: ObjectId) -> MediaBox {
        let corners: Option<Vec<f32>> = self
            .inherited(page_id, b"MediaBox")
            .and_then(|obj| obj.as_array().ok())
            .map(|arr| {
                arr.iter()
                    .filter_map(|o| number(resolve(&self.doc, o)))
                    .collect()
            });

        match corners.as_deref() {
            Some(&[x0, y0, x1, y1]) => MediaBox {
                x0: x0.min(x1),
                y0: y0.min(y1),
                x1: x0.max(x1),
                y1: y0.max(y1),
            },
            _ => MediaBox::default(),
        }
    }

    /// Look up a page attribute, following /Parent inheritance.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Option<&Object> {
        let mut current = self.doc.get_dictionary(page_id).ok();

        for _ in 0..MAX_INHERIT_DEPTH {
            let dict = current?;
            if let Ok(obj) = dict.get(key) {
                return Some(resolve(&self.doc, obj));
            }
            current = dict
                .get(b"Parent")
                .ok()
                .and_then(|p| resolve(&self.doc, p).as_dict().ok());
        }

        None
    }
}
