//! # salarypdf
//!
//! Salary report extraction for Rust.
//!
//! This library reads the yearly player salary reports published as PDF,
//! recovers the salary table on every page, and writes one normalized CSV
//! per year. The yearly CSVs can then be combined into a single dataset
//! with a `year` column.
//!
//! ## Quick Start
//!
//! ```no_run
//! use salarypdf::SalaryPdf;
//!
//! fn main() -> salarypdf::Result<()> {
//!     let summary = SalaryPdf::new("data")
//!         .with_years(2007..=2019)
//!         .lenient()
//!         .run()?;
//!
//!     println!("{} rows combined", summary.combined.rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Glyphs**: content streams are interpreted with `lopdf` into
//!   positioned characters ([`parser`])
//! - **Layout**: the data region, column gutters and row bands are inferred
//!   from glyph positions alone ([`table`])
//! - **Cleaning**: money parsing, club names, Unicode normalization
//!   ([`clean`])
//! - **Output**: yearly CSVs ([`convert`]), then one combined CSV
//!   ([`combine`])

pub mod clean;
pub mod combine;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod table;

// Re-export commonly used types
pub use clean::{normalize_text, parse_money, ClubAliases};
pub use combine::{combine_csvs, extract_year, CombineOptions, CombineSummary, CombinedFile};
pub use convert::{
    parse_report, write_records, ConvertOptions, ParsedReport, ReportConverter, YearSummary,
};
pub use detect::{is_pdf, pdf_version_from_bytes, pdf_version_from_path};
pub use error::{Error, Result};
pub use model::{BBox, Page, SalaryRecord, TextChar, Word, WordOptions, COLUMNS};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use table::{analyze_page, parse_page, LayoutOptions, PageLayout, ReportLayout};

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// File name of the combined CSV, written to the data directory.
pub const COMBINED_FILE_NAME: &str = "combined_csv.csv";

/// JSON output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Indented, one field per line
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Serialize a summary or layout dump to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Run table inference on one page of a report and return the intermediate
/// layout.
///
/// # Example
///
/// ```no_run
/// use salarypdf::{inspect_page, LayoutOptions};
///
/// let layout = inspect_page("mls-salaries-2019.pdf", 2019, 1, &LayoutOptions::default())?;
/// println!("gutters: {:?}", layout.gutters);
/// # Ok::<(), salarypdf::Error>(())
/// ```
pub fn inspect_page<P: AsRef<Path>>(
    path: P,
    year: i32,
    page_num: u32,
    options: &LayoutOptions,
) -> Result<PageLayout> {
    let parser = PdfParser::open(path)?;
    let page = parser.page(page_num)?;
    analyze_page(&page, year, options)
}

/// Run table inference on every page of a report.
pub fn inspect_report<P: AsRef<Path>>(
    path: P,
    year: i32,
    options: &LayoutOptions,
) -> Result<Vec<PageLayout>> {
    let parser = PdfParser::open(path)?;
    parser
        .pages()?
        .iter()
        .map(|page| analyze_page(page, year, options))
        .collect()
}

/// Builder for the full convert-then-combine pipeline over a data directory.
///
/// # Example
///
/// ```no_run
/// use salarypdf::SalaryPdf;
///
/// let years = SalaryPdf::new("data")
///     .with_years(2015..=2016)
///     .sequential()
///     .convert()?;
/// # Ok::<(), salarypdf::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SalaryPdf {
    convert_options: ConvertOptions,
    output: Option<PathBuf>,
    write_bom: bool,
}

/// Outcome of [`SalaryPdf::run`].
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Per-year conversion results, in year order
    pub years: Vec<YearSummary>,
    /// Combine result
    pub combined: CombineSummary,
}

impl SalaryPdf {
    /// Create a pipeline rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_options(ConvertOptions::new(data_dir))
    }

    /// Create a pipeline from explicit conversion options.
    pub fn with_options(options: ConvertOptions) -> Self {
        Self {
            convert_options: options,
            output: None,
            write_bom: true,
        }
    }

    /// Restrict conversion to `years`.
    pub fn with_years(mut self, years: RangeInclusive<i32>) -> Self {
        self.convert_options = self.convert_options.with_years(years);
        self
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.convert_options = self.convert_options.lenient();
        self
    }

    /// Convert years one after another.
    pub fn sequential(mut self) -> Self {
        self.convert_options = self.convert_options.sequential();
        self
    }

    /// Write the combined CSV to `path` instead of the data directory.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Write the combined CSV without a byte order mark.
    pub fn without_bom(mut self) -> Self {
        self.write_bom = false;
        self
    }

    /// Conversion options in use.
    pub fn convert_options(&self) -> &ConvertOptions {
        &self.convert_options
    }

    /// Combine options derived from the data directory and output settings.
    pub fn combine_options(&self) -> CombineOptions {
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| self.convert_options.data_dir.join(COMBINED_FILE_NAME));
        let options = CombineOptions::new(self.convert_options.csv_dir(), output);
        if self.write_bom {
            options
        } else {
            options.without_bom()
        }
    }

    /// Convert every configured year to CSV.
    pub fn convert(&self) -> Result<Vec<YearSummary>> {
        ReportConverter::new(self.convert_options.clone()).convert_all()
    }

    /// Combine the yearly CSVs.
    pub fn combine(&self) -> Result<CombineSummary> {
        combine_csvs(&self.combine_options())
    }

    /// Convert, then combine.
    pub fn run(&self) -> Result<RunSummary> {
        let years = self.convert()?;
        let combined = self.combine()?;
        Ok(RunSummary { years, combined })
    }
}
