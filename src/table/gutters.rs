//! Column gutter inference.
//!
//! The reports draw no rules between columns. Within a column, glyph left
//! edges sit at most one advance apart; the first glyph of the next column
//! starts well to the right of anything in the previous one. So after
//! collecting the distinct x0 values of every glyph in the table, a jump
//! wider than the threshold marks the start of a new column.

use std::cmp::Ordering;

use crate::model::TextChar;

/// x positions where new columns start, truncated to whole points, ascending.
///
/// The leftmost x0 never counts as a gutter.
pub fn find_gutters(chars: &[TextChar], min_width: f32) -> Vec<f32> {
    let mut x0s: Vec<f32> = chars.iter().map(|c| c.x0).collect();
    x0s.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    x0s.dedup();

    let gutters: Vec<f32> = x0s
        .windows(2)
        .filter(|pair| pair[1] - pair[0] > min_width)
        .map(|pair| pair[1].trunc())
        .collect();

    log::debug!("Found {} gutters at {:?}", gutters.len(), gutters);
    gutters
}

/// Vertical rulings for a table spanning `left..right` with `gutters` inside.
pub fn vertical_lines(left: f32, gutters: &[f32], right: f32) -> Vec<f32> {
    let mut lines = Vec::with_capacity(gutters.len() + 2);
    lines.push(left);
    lines.extend_from_slice(gutters);
    lines.push(right);
    lines.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    lines.dedup();
    lines
}
