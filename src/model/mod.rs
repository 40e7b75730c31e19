//! Page and record model.
//!
//! Pages hold positioned glyphs in top-down coordinates, the same frame the
//! layout heuristics in [`crate::table`] reason in. Records are the cleaned
//! rows written to CSV.

mod geometry;
mod page;
mod record;

pub use geometry::BBox;
pub use page::{Page, TextChar, Word, WordOptions};
pub use record::{SalaryRecord, COLUMNS};

pub(crate) use page::text_from_chars;
