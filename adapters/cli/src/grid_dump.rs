//! Plain-text grid dumps: one row per line, cells separated by whitespace.

use maze_runner_core::{Grid, GridShapeError};
use thiserror::Error;

/// Errors that can occur while reading a grid dump.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum GridDumpError {
    /// The dump contained no cell values at all.
    #[error("grid dump contains no cells")]
    Empty,
    /// A line held a different number of cells than the first non-blank line.
    #[error("line {line} has {found} cells, expected {expected}")]
    RaggedRow {
        /// One-based line number in the dump.
        line: usize,
        /// Cell count of the first row.
        expected: usize,
        /// Cell count of the offending line.
        found: usize,
    },
    /// A token was not an integral number.
    #[error("line {line}: '{token}' is not an integral cell value")]
    InvalidToken {
        /// One-based line number in the dump.
        line: usize,
        /// Offending token as written.
        token: String,
    },
    /// The rows could not be assembled into a grid.
    #[error(transparent)]
    Shape(#[from] GridShapeError),
}

/// Reads a grid from its textual dump.
///
/// Blank lines are skipped. Besides plain integers, float tokens such as
/// `-1.000000000000000000e+00` are accepted as long as they are integral.
pub(crate) fn parse(text: &str) -> Result<Grid, GridDumpError> {
    let mut rows: Vec<Vec<i32>> = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let row = raw
            .split_whitespace()
            .map(|token| {
                parse_cell(token).ok_or_else(|| GridDumpError::InvalidToken {
                    line,
                    token: token.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if row.is_empty() {
            continue;
        }
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(GridDumpError::RaggedRow {
                    line,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(GridDumpError::Empty);
    }
    Ok(Grid::from_rows(rows)?)
}

/// Writes the grid as integers separated by single spaces.
pub(crate) fn format(grid: &Grid) -> String {
    let width = usize::try_from(grid.columns()).unwrap_or(1).max(1);
    let mut text = String::new();
    for row in grid.cells().chunks(width) {
        let line: Vec<String> = row.iter().map(|code| code.get().to_string()).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

#[allow(clippy::cast_possible_truncation)]
fn parse_cell(token: &str) -> Option<i32> {
    if let Ok(value) = token.parse::<i32>() {
        return Some(value);
    }
    let value = token.parse::<f64>().ok()?;
    let in_range = (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value);
    (in_range && value.fract() == 0.0).then_some(value as i32)
}
