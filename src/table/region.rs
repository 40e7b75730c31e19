//! Locating the data region of a report page.
//!
//! Reports before the modern layout repeat the column header on every page
//! (ending with the word `Compensation`) and end each page with a
//! `Source:` footer. Modern reports print the header block once, on the
//! first page, and carry a single running word at the top of later pages.
//! In both layouts the last word on a page is the page number.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{BBox, Page, Word};

use super::options::LayoutOptions;

/// Last word of the repeated column header in legacy reports.
pub const HEADER_END_MARKER: &str = "Compensation";

/// First word of the footer in legacy reports.
pub const FOOTER_MARKER: &str = "Source:";

/// Page layout family of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportLayout {
    /// Header and footer on every page
    Legacy,
    /// Header block on the first page only
    Modern,
}

impl ReportLayout {
    /// Layout used by the report for `year`.
    pub fn for_year(year: i32, modern_from: i32) -> Self {
        if year >= modern_from {
            ReportLayout::Modern
        } else {
            ReportLayout::Legacy
        }
    }
}

/// The slice of `words` that belongs to the salary table.
pub fn data_words<'a>(
    words: &'a [Word],
    page_number: u32,
    layout: ReportLayout,
    options: &LayoutOptions,
) -> Result<&'a [Word]> {
    let (first, last) = match layout {
        ReportLayout::Modern => {
            let first = if page_number == 1 {
                options.modern_header_words
            } else {
                1
            };
            (first, words.len().saturating_sub(1))
        }
        ReportLayout::Legacy => {
            let first = position_of(words, HEADER_END_MARKER, page_number)? + 1;
            let last = position_of(words, FOOTER_MARKER, page_number)?;
            (first, last)
        }
    };

    if first >= last {
        return Err(Error::EmptyDataRegion(page_number));
    }
    Ok(&words[first..last])
}

/// Bounding box of the salary table on `page`.
pub fn data_bbox(page: &Page, layout: ReportLayout, options: &LayoutOptions) -> Result<BBox> {
    let words = page.extract_words(&options.words);
    let data = data_words(&words, page.number, layout, options)?;

    let bbox = BBox::enclosing(data.iter().map(Word::bbox))
        .ok_or(Error::EmptyDataRegion(page.number))?;
    log::debug!(
        "Page {}: {} data words in ({:.1}, {:.1}, {:.1}, {:.1})",
        page.number,
        data.len(),
        bbox.x0,
        bbox.top,
        bbox.x1,
        bbox.bottom
    );
    Ok(bbox)
}

fn position_of(words: &[Word], marker: &str, page: u32) -> Result<usize> {
    words
        .iter()
        .position(|w| w.text == marker)
        .ok_or_else(|| Error::MissingMarker {
            marker: marker.to_string(),
            page,
        })
}
