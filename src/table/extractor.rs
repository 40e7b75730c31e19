//! Table extraction from explicit column rulings and text-derived rows.

use std::cmp::Ordering;

use crate::model::{text_from_chars, Page, TextChar, Word};

use super::options::LayoutOptions;

/// Split `view` into a grid of cell texts.
///
/// Columns are the bands between consecutive `vertical` lines. Rows come
/// from the words themselves: words are clustered by `top`, and a ruling is
/// placed at the top of every cluster plus the bottom of the last one. Each
/// glyph lands in the cell containing its midpoint; glyphs outside the grid
/// are dropped. Cells with no glyphs are empty strings.
pub fn extract_table(view: &Page, vertical: &[f32], options: &LayoutOptions) -> Vec<Vec<String>> {
    if vertical.len() < 2 {
        return Vec::new();
    }

    let words = view.extract_words(&options.words);
    let horizontal = horizontal_lines(&words, options.row_tolerance);
    if horizontal.len() < 2 {
        return Vec::new();
    }

    let columns = vertical.len() - 1;
    let rows = horizontal.len() - 1;
    let mut grid: Vec<Vec<Vec<&TextChar>>> = vec![vec![Vec::new(); columns]; rows];

    for ch in &view.chars {
        if let (Some(row), Some(col)) = (
            band_index(&horizontal, ch.mid_y()),
            band_index(vertical, ch.mid_x()),
        ) {
            grid[row][col].push(ch);
        }
    }

    log::debug!(
        "Page {}: {} rows x {} columns",
        view.number,
        rows,
        columns
    );

    grid.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| text_from_chars(&cell, &options.words))
                .collect()
        })
        .collect()
}

/// Row rulings: the top of each word cluster and the bottom of the last.
fn horizontal_lines(words: &[Word], tolerance: f32) -> Vec<f32> {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(Ordering::Equal));

    let mut clusters: Vec<Vec<&Word>> = Vec::new();
    let mut last_top: Option<f32> = None;
    for word in sorted {
        match (last_top, clusters.last_mut()) {
            (Some(top), Some(cluster)) if word.top - top <= tolerance => cluster.push(word),
            _ => clusters.push(vec![word]),
        }
        last_top = Some(word.top);
    }

    let mut lines: Vec<f32> = clusters
        .iter()
        .filter_map(|cluster| cluster.first().map(|w| w.top))
        .collect();
    if let Some(bottom) = clusters.last().and_then(|cluster| {
        cluster
            .iter()
            .map(|w| w.bottom)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }) {
        lines.push(bottom);
    }
    lines
}

/// Index of the band `[lines[i], lines[i + 1])` holding `value`; the last
/// band also includes its far edge.
fn band_index(lines: &[f32], value: f32) -> Option<usize> {
    let last = lines.len().checked_sub(1)?;
    (0..last).find(|&i| {
        value >= lines[i] && (value < lines[i + 1] || (i + 1 == last && value <= lines[i + 1]))
    })
}
