//! Conversion of yearly salary reports to CSV.
//!
//! Each report is read page by page: glyphs are extracted from the PDF,
//! the salary table is located and split into cells, and every row is
//! cleaned into a [`SalaryRecord`]. The records of one report are written
//! to one CSV file.
//!
//! # Example
//!
//! ```no_run
//! use salarypdf::convert::{ConvertOptions, ReportConverter};
//!
//! fn main() -> salarypdf::Result<()> {
//!     let options = ConvertOptions::new("data").with_years(2018..=2019);
//!     for summary in ReportConverter::new(options).convert_all()? {
//!         println!("{}: {} rows", summary.year, summary.rows);
//!     }
//!     Ok(())
//! }
//! ```

mod options;

pub use options::{ConvertOptions, FIRST_YEAR, LAST_YEAR};

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::model::{SalaryRecord, COLUMNS};
use crate::parser::{ErrorMode, PdfParser};
use crate::table::parse_page;

/// Records read from one report.
#[derive(Debug, Clone, Default)]
pub struct ParsedReport {
    /// Report year
    pub year: i32,
    /// Number of pages in the PDF
    pub pages: u32,
    /// Cleaned rows, in page order
    pub records: Vec<SalaryRecord>,
    /// Pages dropped in lenient mode
    pub skipped_pages: Vec<u32>,
}

/// Outcome of converting one year.
#[derive(Debug, Clone, Serialize)]
pub struct YearSummary {
    /// Report year
    pub year: i32,
    /// Number of pages in the PDF
    pub pages: u32,
    /// Rows written
    pub rows: usize,
    /// Pages dropped in lenient mode
    pub skipped_pages: Vec<u32>,
    /// CSV written
    pub output: PathBuf,
}

/// Read every page of the report at `path` for `year`.
///
/// In strict mode the first failing page fails the report. In lenient mode
/// the page is logged, recorded in `skipped_pages` and left out.
pub fn parse_report<P: AsRef<Path>>(
    path: P,
    year: i32,
    options: &ConvertOptions,
) -> Result<ParsedReport> {
    let parser = PdfParser::open_with_options(path, options.parse.clone())?;
    let mut report = ParsedReport {
        year,
        pages: parser.page_count(),
        ..ParsedReport::default()
    };

    for page_num in 1..=report.pages {
        log::info!("{}, page {}", year, page_num);

        let rows = parser
            .page(page_num)
            .and_then(|page| parse_page(&page, year, &options.layout, &options.aliases));
        match rows {
            Ok(rows) => report.records.extend(rows),
            Err(e) if options.error_mode() == ErrorMode::Lenient => {
                log::warn!("{}, page {} skipped: {}", year, page_num, e);
                report.skipped_pages.push(page_num);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

/// Write `records` to a CSV file at `path`, header first.
///
/// The header is written even when there are no records.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[SalaryRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Converts yearly reports found under a data directory.
#[derive(Debug, Clone, Default)]
pub struct ReportConverter {
    options: ConvertOptions,
}

impl ReportConverter {
    /// Create a converter.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert the report for `year`.
    pub fn convert_year(&self, year: i32) -> Result<YearSummary> {
        let input = self.options.pdf_path(year);
        let output = self.options.csv_path(year);

        let report = parse_report(&input, year, &self.options)?;
        write_records(&output, &report.records)?;

        log::info!(
            "{}: {} rows from {} pages written to {}",
            year,
            report.records.len(),
            report.pages,
            output.display()
        );

        Ok(YearSummary {
            year,
            pages: report.pages,
            rows: report.records.len(),
            skipped_pages: report.skipped_pages,
            output,
        })
    }

    /// Convert every year in the configured range.
    ///
    /// Summaries come back in year order whether or not years run in
    /// parallel.
    pub fn convert_all(&self) -> Result<Vec<YearSummary>> {
        let years: Vec<i32> = self.options.years.clone().collect();

        if self.options.parallel {
            years
                .par_iter()
                .map(|&year| self.convert_year(year))
                .collect()
        } else {
            years.iter().map(|&year| self.convert_year(year)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn record(club: &str, base: Option<f64>) -> SalaryRecord {
        SalaryRecord {
            club: club.to_string(),
            last_name: "Doe".to_string(),
            first_name: "John".to_string(),
            position: "D".to_string(),
            base_salary: base,
            guaranteed_compensation: None,
        }
    }

    #[test]
    fn test_write_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        write_records(&path, &[record("Chicago Fire", Some(50_000.0))]).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("club,last_name,first_name,position,base_salary,guaranteed_compensation")
        );
        assert_eq!(lines.next(), Some("Chicago Fire,Doe,John,D,50000.0,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_no_records_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_records(&path, &[]).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written.trim_end(),
            "club,last_name,first_name,position,base_salary,guaranteed_compensation"
        );
    }

    #[test]
    fn test_missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let converter = ReportConverter::new(ConvertOptions::new(dir.path()).sequential());

        let err = converter.convert_year(2010).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!converter.options().csv_path(2010).exists());
    }

    #[test]
    fn test_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConvertOptions::new(dir.path()).with_years(2011..=2011);
        fs::create_dir_all(options.pdf_dir()).unwrap();
        fs::write(options.pdf_path(2011), b"year,club\n").unwrap();

        let err = ReportConverter::new(options).convert_all().unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
    }
}
