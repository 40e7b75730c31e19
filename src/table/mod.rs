//! Salary table inference on report pages.
//!
//! A page is processed in four steps: find the data region from the word
//! stream ([`data_bbox`]), crop to it, infer column gutters from glyph x
//! positions ([`find_gutters`]), and cut the crop into a grid
//! ([`extract_table`]).

mod extractor;
mod gutters;
mod options;
mod region;

pub use extractor::extract_table;
pub use gutters::{find_gutters, vertical_lines};
pub use options::LayoutOptions;
pub use region::{data_bbox, data_words, ReportLayout, FOOTER_MARKER, HEADER_END_MARKER};

use serde::{Deserialize, Serialize};

use crate::clean::{clean_row, ClubAliases};
use crate::error::Result;
use crate::model::{BBox, Page, SalaryRecord};

/// Intermediate results of table inference on one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub page: u32,
    /// Layout family the page was read with
    pub layout: ReportLayout,
    /// Data region
    pub bbox: BBox,
    /// Inferred column starts
    pub gutters: Vec<f32>,
    /// Column rulings, including the region edges
    pub vertical_lines: Vec<f32>,
    /// Raw cell texts, row by row
    pub rows: Vec<Vec<String>>,
}

/// Run table inference on `page` of the report for `year`.
pub fn analyze_page(page: &Page, year: i32, options: &LayoutOptions) -> Result<PageLayout> {
    let layout = ReportLayout::for_year(year, options.modern_layout_year);
    let bbox = data_bbox(page, layout, options)?;
    let cropped = page.within_bbox(bbox);

    let gutters = find_gutters(&cropped.chars, options.min_gutter_width);
    let crop = cropped.bbox();
    let lines = vertical_lines(crop.x0, &gutters, crop.x1);
    let rows = extract_table(&cropped, &lines, options);

    Ok(PageLayout {
        page: page.number,
        layout,
        bbox,
        gutters,
        vertical_lines: lines,
        rows,
    })
}

/// Extract cleaned salary records from `page` of the report for `year`.
pub fn parse_page(
    page: &Page,
    year: i32,
    options: &LayoutOptions,
    aliases: &ClubAliases,
) -> Result<Vec<SalaryRecord>> {
    let layout = analyze_page(page, year, options)?;
    layout
        .rows
        .into_iter()
        .map(|cells| clean_row(page.number, cells, aliases))
        .collect()
}
