//! Combining yearly CSVs into one dataset.
//!
//! Every `*.csv` file in the input directory is read in name order. Its year
//! comes from the file name and is written into a year column on each row.
//! A file that already has that column keeps it in place with its values
//! overwritten; otherwise the column is appended. The combined header is the union of all file headers in first-seen order;
//! a file without a column leaves that cell empty.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn digit_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+").expect("static pattern compiles"))
}

/// The year in a CSV file name: the first run of ASCII digits in its base name.
pub fn extract_year<P: AsRef<Path>>(file_name: P) -> Result<i32> {
    let path = file_name.as_ref();
    let missing = || Error::MissingYear(path.to_path_buf());

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .ok_or_else(missing)?;
    let digits = digit_run().find(&name).ok_or_else(missing)?;
    digits.as_str().parse().map_err(|_| missing())
}

/// Options for [`combine_csvs`].
#[derive(Debug, Clone)]
pub struct CombineOptions {
    /// Directory scanned for `*.csv` files
    pub input_dir: PathBuf,

    /// Combined CSV path
    pub output: PathBuf,

    /// Name of the year column
    pub year_column: String,

    /// Whether to start the output with a UTF-8 byte order mark
    pub write_bom: bool,
}

impl CombineOptions {
    /// Combine the CSVs in `input_dir` into `output`.
    pub fn new(input_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output: output.into(),
            year_column: "year".to_string(),
            write_bom: true,
        }
    }

    /// Set the year column name.
    pub fn with_year_column(mut self, name: impl Into<String>) -> Self {
        self.year_column = name.into();
        self
    }

    /// Write the output without a byte order mark.
    pub fn without_bom(mut self) -> Self {
        self.write_bom = false;
        self
    }
}

/// One input file of a combine run.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedFile {
    /// Input path
    pub path: PathBuf,
    /// Year taken from the file name
    pub year: i32,
    /// Data rows read
    pub rows: usize,
}

/// Outcome of [`combine_csvs`].
#[derive(Debug, Clone, Serialize)]
pub struct CombineSummary {
    /// Inputs in the order they were combined
    pub files: Vec<CombinedFile>,
    /// Output header
    pub columns: Vec<String>,
    /// Total data rows written
    pub rows: usize,
    /// Combined CSV written
    pub output: PathBuf,
}

struct CsvTable {
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

/// Concatenate the CSVs described by `options` into one file.
pub fn combine_csvs(options: &CombineOptions) -> Result<CombineSummary> {
    let paths = csv_files(&options.input_dir, &options.output)?;
    log::info!(
        "Combining {} CSV files from {}",
        paths.len(),
        options.input_dir.display()
    );

    let mut columns: Vec<String> = Vec::new();
    let mut tables = Vec::with_capacity(paths.len());
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let year = extract_year(&path)?;
        let table = read_table(&path)?;

        let has_year = table.headers.contains(&options.year_column);
        for name in table
            .headers
            .iter()
            .chain((!has_year).then_some(&options.year_column))
        {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }

        log::debug!("{}: {} rows for {}", path.display(), table.records.len(), year);
        files.push(CombinedFile {
            path,
            year,
            rows: table.records.len(),
        });
        tables.push(table);
    }

    if let Some(parent) = options.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(&options.output)?;
    if options.write_bom {
        file.write_all(UTF8_BOM)?;
    }
    let mut writer = csv::Writer::from_writer(file);
    if !columns.is_empty() {
        writer.write_record(&columns)?;
    }

    let mut rows = 0;
    for (table, source) in tables.iter().zip(&files) {
        let index: HashMap<&str, usize> = table
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();
        let year = source.year.to_string();

        for record in &table.records {
            let row = columns.iter().map(|column| {
                if *column == options.year_column {
                    year.as_str()
                } else {
                    index
                        .get(column.as_str())
                        .and_then(|&i| record.get(i))
                        .unwrap_or("")
                }
            });
            writer.write_record(row)?;
            rows += 1;
        }
    }
    writer.flush()?;

    log::info!(
        "Wrote {} rows in {} columns to {}",
        rows,
        columns.len(),
        options.output.display()
    );

    Ok(CombineSummary {
        files,
        columns,
        rows,
        output: options.output.clone(),
    })
}

/// `*.csv` files directly in `dir`, sorted by path, leaving out `output`.
fn csv_files(dir: &Path, output: &Path) -> Result<Vec<PathBuf>> {
    let output = output.canonicalize().ok();

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        if output.is_some() && path.canonicalize().ok() == output {
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

fn read_table(path: &Path) -> Result<CsvTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // A leading BOM from an earlier combine run sticks to the first name.
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();
    let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(CsvTable { headers, records })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("mls-salaries-2007.csv").unwrap(), 2007);
        assert_eq!(extract_year("data/csvs/mls-salaries-2019.csv").unwrap(), 2019);
        assert_eq!(extract_year("2012_v2.csv").unwrap(), 2012);
        // Directories do not contribute digits.
        assert_eq!(extract_year("2020/salaries-2015.csv").unwrap(), 2015);
    }

    #[test]
    fn test_extract_year_missing() {
        let err = extract_year("salaries.csv").unwrap_err();
        assert!(matches!(err, Error::MissingYear(ref p) if p == Path::new("salaries.csv")));
        assert!(extract_year("1999/salaries.csv").is_err());
    }

    #[test]
    fn test_combine_union_of_columns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s-2008.csv"), "club,base_salary\nDC,100.0\n").unwrap();
        fs::write(
            dir.path().join("s-2007.csv"),
            "club,position\nCHI,D\nNE,\"F,M\"\n",
        )
        .unwrap();
        let output = dir.path().join("combined.csv");

        let summary = combine_csvs(&CombineOptions::new(dir.path(), &output)).unwrap();

        assert_eq!(summary.rows, 3);
        assert_eq!(summary.columns, vec!["club", "position", "year", "base_salary"]);
        let years: Vec<i32> = summary.files.iter().map(|f| f.year).collect();
        assert_eq!(years, vec![2007, 2008]);

        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text,
            "club,position,year,base_salary\nCHI,D,2007,\nNE,\"F,M\",2007,\nDC,,2008,100.0\n"
        );
    }

    #[test]
    fn test_existing_year_column_is_overwritten_in_place() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x-2010.csv"), "year,club\n1999,LA\n").unwrap();
        fs::write(dir.path().join("x-2011.csv"), "club,pos\nNE,D\n").unwrap();
        let output = dir.path().join("out").join("all.csv");

        let summary =
            combine_csvs(&CombineOptions::new(dir.path(), &output).without_bom()).unwrap();

        assert_eq!(summary.columns, vec!["year", "club", "pos"]);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "year,club,pos\n2010,LA,\n2011,NE,D\n"
        );
    }

    #[test]
    fn test_rerun_skips_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x-2010.csv"), "club\nLA\n").unwrap();
        let options = CombineOptions::new(dir.path(), dir.path().join("combined-0.csv"));

        combine_csvs(&options).unwrap();
        let summary = combine_csvs(&options).unwrap();

        assert_eq!(summary.files.len(), 1);
        assert_eq!(summary.rows, 1);
    }

    #[test]
    fn test_file_without_year_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.csv"), "a\n1\n").unwrap();
        let output = dir.path().join("out").join("all.csv");

        let err = combine_csvs(&CombineOptions::new(dir.path(), output)).unwrap_err();
        assert!(matches!(err, Error::MissingYear(_)));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("all.csv");

        let summary =
            combine_csvs(&CombineOptions::new(dir.path(), &output).without_bom()).unwrap();

        assert_eq!(summary.rows, 0);
        assert_eq!(summary.columns, Vec::<String>::new());
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }
}
