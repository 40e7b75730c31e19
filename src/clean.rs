//! Field cleaning: money strings, club abbreviations, and text normalization.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{SalaryRecord, COLUMNS};

/// Club abbreviations used in the reports and their full names.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("CHI", "Chicago Fire"),
    ("CLB", "Columbus Crew"),
    ("COL", "Colorado Rapids"),
    ("DAL", "FC Dallas"),
    ("DC", "DC United"),
    ("HOU", "Houston Dynamo"),
    ("KC", "Sporting Kansas City"),
    ("LA", "LA Galaxy"),
    ("NE", "New England Revolution"),
    ("NY", "New York Red Bulls"),
    ("RSL", "Real Salt Lake"),
    ("TFC", "Toronto FC"),
    ("SJ", "San Jose Earthquakes"),
    ("SEA", "Seattle Sounders FC"),
    ("PHI", "Philadelphia Union"),
    ("VAN", "Vancouver Whitecaps"),
    ("POR", "Portland Timbers"),
    ("TOR", "Toronto FC"),
    ("MTL", "Montreal Impact"),
    ("ORL", "Orlando City SC"),
    ("NYCFC", "New York City FC"),
    ("ATL", "Atlanta United"),
    ("NYRB", "New York Red Bulls"),
    ("MNUFC", "Minnesota United"),
];

fn non_money_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^0-9.]").expect("static pattern compiles"))
}

/// Parse a money string such as `"$1,250,000.00"`.
///
/// Everything except ASCII digits and `.` is stripped first. Returns `None`
/// when nothing numeric remains or the remainder is not a number.
pub fn parse_money(s: &str) -> Option<f64> {
    let stripped = non_money_chars().replace_all(s, "");
    if stripped.is_empty() {
        return None;
    }
    match stripped.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::debug!("Unparseable money value {:?}", s);
            None
        }
    }
}

/// Trim and NFC-normalize a text cell.
pub fn normalize_text(s: &str) -> String {
    s.trim().nfc().collect()
}

/// Mapping from club abbreviations to full names.
#[derive(Debug, Clone)]
pub struct ClubAliases {
    aliases: HashMap<String, String>,
}

impl ClubAliases {
    /// An empty alias table: every club passes through unchanged.
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Add or replace an alias.
    pub fn insert(&mut self, abbreviation: impl Into<String>, name: impl Into<String>) {
        self.aliases.insert(abbreviation.into(), name.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_alias(mut self, abbreviation: impl Into<String>, name: impl Into<String>) -> Self {
        self.insert(abbreviation, name);
        self
    }

    /// Full name for `club`, or `club` itself when it is not an alias.
    pub fn apply<'a>(&'a self, club: &'a str) -> &'a str {
        self.aliases.get(club).map(String::as_str).unwrap_or(club)
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for ClubAliases {
    fn default() -> Self {
        Self {
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(abbr, name)| (abbr.to_string(), name.to_string()))
                .collect(),
        }
    }
}

/// Turn one extracted table row into a record.
///
/// `page` is only used for the error when the row does not have one cell
/// per output column.
pub fn clean_row(page: u32, cells: Vec<String>, aliases: &ClubAliases) -> Result<SalaryRecord> {
    let cells: [String; 6] = cells.try_into().map_err(|cells: Vec<String>| Error::ColumnMismatch {
        page,
        expected: COLUMNS.len(),
        found: cells.len(),
    })?;
    let [club, last_name, first_name, position, base_salary, guaranteed] = cells;

    let club = normalize_text(&club);
    Ok(SalaryRecord {
        club: aliases.apply(&club).to_string(),
        last_name: normalize_text(&last_name),
        first_name: normalize_text(&first_name),
        position: normalize_text(&position),
        base_salary: parse_money(&base_salary),
        guaranteed_compensation: parse_money(&guaranteed),
    })
}
