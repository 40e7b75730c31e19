//! PDF parsing module.

mod base14;
mod fonts;
mod layout;
mod options;
mod pdf_parser;

pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
