//! Conversion options: where reports live and how to read them.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::clean::ClubAliases;
use crate::parser::{ErrorMode, ParseOptions};
use crate::table::LayoutOptions;

/// First report year in the archive.
pub const FIRST_YEAR: i32 = 2007;

/// Last report year in the archive.
pub const LAST_YEAR: i32 = 2019;

/// Options for converting a directory of yearly reports.
///
/// Reports are read from `<data_dir>/<pdf_subdir>/<file_prefix><year>.pdf`
/// and written to `<data_dir>/<csv_subdir>/<file_prefix><year>.csv`.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Root of the data tree
    pub data_dir: PathBuf,

    /// Directory of source PDFs, relative to `data_dir`
    pub pdf_subdir: String,

    /// Directory of yearly CSVs, relative to `data_dir`
    pub csv_subdir: String,

    /// File name stem before the year
    pub file_prefix: String,

    /// Report years to convert
    pub years: RangeInclusive<i32>,

    /// Whether to convert years in parallel
    pub parallel: bool,

    /// Club abbreviation table
    pub aliases: ClubAliases,

    /// Table inference options
    pub layout: LayoutOptions,

    /// Glyph extraction options (carries the error mode)
    pub parse: ParseOptions,
}

impl ConvertOptions {
    /// Create new conversion options rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Set the year range.
    pub fn with_years(mut self, years: RangeInclusive<i32>) -> Self {
        self.years = years;
        self
    }

    /// Set the file name prefix.
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Set the PDF and CSV sub-directories.
    pub fn with_subdirs(mut self, pdf: impl Into<String>, csv: impl Into<String>) -> Self {
        self.pdf_subdir = pdf.into();
        self.csv_subdir = csv.into();
        self
    }

    /// Enable lenient mode (skip pages that fail, keep going).
    pub fn lenient(mut self) -> Self {
        self.parse.error_mode = ErrorMode::Lenient;
        self
    }

    /// Convert years one after another.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the club alias table.
    pub fn with_aliases(mut self, aliases: ClubAliases) -> Self {
        self.aliases = aliases;
        self
    }

    /// Set table inference options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set glyph extraction options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Current error mode.
    pub fn error_mode(&self) -> ErrorMode {
        self.parse.error_mode
    }

    /// Directory holding the source PDFs.
    pub fn pdf_dir(&self) -> PathBuf {
        self.data_dir.join(&self.pdf_subdir)
    }

    /// Directory holding the yearly CSVs.
    pub fn csv_dir(&self) -> PathBuf {
        self.data_dir.join(&self.csv_subdir)
    }

    /// Source PDF for `year`.
    pub fn pdf_path(&self, year: i32) -> PathBuf {
        self.pdf_dir()
            .join(format!("{}{}.pdf", self.file_prefix, year))
    }

    /// Output CSV for `year`.
    pub fn csv_path(&self, year: i32) -> PathBuf {
        self.csv_dir()
            .join(format!("{}{}.csv", self.file_prefix, year))
    }

    /// Root of the data tree.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            pdf_subdir: "pdfs".to_string(),
            csv_subdir: "csvs".to_string(),
            file_prefix: "mls-salaries-".to_string(),
            years: FIRST_YEAR..=LAST_YEAR,
            parallel: true,
            aliases: ClubAliases::default(),
            layout: LayoutOptions::default(),
            parse: ParseOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let options = ConvertOptions::new("/data");
        assert_eq!(
            options.pdf_path(2012),
            PathBuf::from("/data/pdfs/mls-salaries-2012.pdf")
        );
        assert_eq!(
            options.csv_path(2012),
            PathBuf::from("/data/csvs/mls-salaries-2012.csv")
        );
        assert_eq!(options.years, 2007..=2019);
        assert_eq!(options.error_mode(), ErrorMode::Strict);
        assert!(options.parallel);
    }

    #[test]
    fn test_builder() {
        let options = ConvertOptions::new("data")
            .with_years(2018..=2019)
            .with_file_prefix("salaries-")
            .with_subdirs("in", "out")
            .lenient()
            .sequential();

        assert_eq!(options.years, 2018..=2019);
        assert_eq!(options.error_mode(), ErrorMode::Lenient);
        assert!(!options.parallel);
        assert_eq!(
            options.csv_path(2019),
            PathBuf::from("data/out/salaries-2019.csv")
        );
        assert_eq!(options.pdf_dir(), PathBuf::from("data/in"));
    }
}
