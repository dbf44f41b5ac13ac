//! Two-column data files: whitespace separated, `#` comments.

use std::fmt::Write as _;
use std::path::Path;

use crate::{ProjectError, ProjectResult};

/// Parse `x y` rows. `path` is only used in error messages.
pub fn parse_two_column(text: &str, path: &Path) -> ProjectResult<Vec<(f64, f64)>> {
    let mut rows = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_error = |what: String| ProjectError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            what,
        };

        let values = line
            .split_whitespace()
            .map(|word| {
                word.parse::<f64>()
                    .map_err(|_| parse_error(format!("`{word}` is not a number")))
            })
            .collect::<ProjectResult<Vec<f64>>>()?;
        match values.as_slice() {
            [x, y] => rows.push((*x, *y)),
            _ => {
                return Err(parse_error(format!(
                    "expected 2 columns, got {}",
                    values.len()
                )));
            }
        }
    }
    Ok(rows)
}

pub fn read_two_column(path: &Path) -> ProjectResult<Vec<(f64, f64)>> {
    let content = std::fs::read_to_string(path)?;
    parse_two_column(&content, path)
}

/// `# header` line followed by one `x y` row per point.
pub fn format_two_column(header: &str, points: &[(f64, f64)]) -> String {
    let mut out = String::with_capacity(32 * (points.len() + 1));
    for line in header.lines() {
        let _ = writeln!(out, "# {line}");
    }
    for (x, y) in points {
        let _ = writeln!(out, "{x} {y}");
    }
    out
}

/// Write a two-column file, creating parent directories.
pub fn write_two_column(path: &Path, header: &str, points: &[(f64, f64)]) -> ProjectResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format_two_column(header, points))?;
    Ok(())
}
