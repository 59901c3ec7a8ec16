//! Parsers for the artifact files.
//!
//! - titles.txt: one title per line, line number = item position
//! - features.csv: one comma-separated row of floats per line
//! - metadata.jsonl: one JSON object per line

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a whole artifact file, mapping a missing file to `FileNotFound`
fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the title index file.
///
/// Empty lines are rejected rather than skipped: skipping one would shift
/// every following position out of line with the feature matrix.
pub fn parse_titles(path: &Path) -> Result<Vec<String>> {
    let content = read_file(path)?;
    parse_titles_str(&content, &file_name(path))
}

pub(crate) fn parse_titles_str(content: &str, file: &str) -> Result<Vec<String>> {
    let mut titles = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let title = line.trim_end_matches('\r');
        if title.trim().is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: idx + 1,
                reason: "Empty title".to_string(),
            });
        }
        titles.push(title.to_string());
    }

    Ok(titles)
}

/// Parse the feature matrix file.
///
/// Format: `0.12,0.0,0.98,...` with the same number of columns on every line
pub fn parse_features(path: &Path) -> Result<Vec<Vec<f32>>> {
    let content = read_file(path)?;
    parse_features_str(&content, &file_name(path))
}

pub(crate) fn parse_features_str(content: &str, file: &str) -> Result<Vec<Vec<f32>>> {
    let mut rows: Vec<Vec<f32>> = Vec::new();
    let mut expected: Option<usize> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Empty feature row".to_string(),
            });
        }

        let row = line_trimmed
            .split(',')
            .map(|field| {
                let field = field.trim();
                let value = field.parse::<f32>().map_err(|e| DataLoadError::ParseError {
                    file: file.to_string(),
                    line: line_no,
                    reason: format!("Invalid feature value '{}': {}", field, e),
                })?;
                // NaN and inf parse fine but poison every distance computed from the row
                if !value.is_finite() {
                    return Err(DataLoadError::ParseError {
                        file: file.to_string(),
                        line: line_no,
                        reason: format!("Non-finite feature value '{}'", field),
                    });
                }
                Ok(value)
            })
            .collect::<Result<Vec<f32>>>()?;

        match expected {
            None => expected = Some(row.len()),
            Some(width) if width != row.len() => {
                return Err(DataLoadError::DimensionMismatch {
                    expected: width,
                    found: row.len(),
                    line: line_no,
                });
            }
            Some(_) => {}
        }

        rows.push(row);
    }

    Ok(rows)
}

/// Parse the metadata table file (JSON lines). Blank lines are skipped.
pub fn parse_metadata(path: &Path) -> Result<Vec<MovieMetadata>> {
    let content = read_file(path)?;
    parse_metadata_str(&content, &file_name(path))
}

pub(crate) fn parse_metadata_str(content: &str, file: &str) -> Result<Vec<MovieMetadata>> {
    let mut rows = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let row: MovieMetadata =
            serde_json::from_str(line_trimmed).map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: idx + 1,
                reason: e.to_string(),
            })?;
        rows.push(row);
    }

    Ok(rows)
}
