//! Normalized salary rows.

use serde::{Deserialize, Serialize};

/// Output columns, in CSV order.
pub const COLUMNS: [&str; 6] = [
    "club",
    "last_name",
    "first_name",
    "position",
    "base_salary",
    "guaranteed_compensation",
];

/// One player's row from a salary report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    /// Full club name (abbreviations expanded)
    pub club: String,
    pub last_name: String,
    pub first_name: String,
    pub position: String,
    /// Base salary in dollars, if the cell held a number
    pub base_salary: Option<f64>,
    /// Guaranteed compensation in dollars, if the cell held a number
    pub guaranteed_compensation: Option<f64>,
}
