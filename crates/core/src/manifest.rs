//! Dataset manifest (`filelist.csv`) parsing.
//!
//! The manifest lists one participant file per line. Columns are located
//! by header name, so column order and extra columns do not matter. Rows
//! that do not fit the schema are skipped and counted, never fatal.

use crate::error::CoreError;

/// Columns every manifest must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["file_id", "label", "split", "batch_idx", "archive_idx"];

/// One validated manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub file_id: String,
    /// Free-form category tag, e.g. `improvised` or `naturalistic`.
    pub label: String,
    /// Dataset partition, e.g. `train`, `dev`, `test`.
    pub split: String,
    pub batch_idx: u32,
    pub archive_idx: u32,
}

/// Result of parsing a whole manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedManifest {
    pub rows: Vec<ManifestRow>,
    /// Data lines rejected by the schema (blank lines are not counted).
    pub skipped_rows: usize,
}

/// Column positions resolved from the header row.
struct ColumnMap {
    file_id: usize,
    label: usize,
    split: usize,
    batch_idx: usize,
    archive_idx: usize,
}

impl ColumnMap {
    fn from_header(header: &str) -> Result<Self, CoreError> {
        let names: Vec<&str> = header.split(',').map(str::trim).collect();
        let find = |column: &str| {
            names.iter().position(|n| *n == column).ok_or_else(|| {
                CoreError::Validation(format!(
                    "Manifest header is missing required column '{column}'. Expected: {}",
                    REQUIRED_COLUMNS.join(", ")
                ))
            })
        };

        Ok(Self {
            file_id: find("file_id")?,
            label: find("label")?,
            split: find("split")?,
            batch_idx: find("batch_idx")?,
            archive_idx: find("archive_idx")?,
        })
    }

    fn parse_row(&self, line: &str) -> Option<ManifestRow> {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let cell = |idx: usize| cells.get(idx).copied();

        let file_id = cell(self.file_id).filter(|s| !s.is_empty())?;

        Some(ManifestRow {
            file_id: file_id.to_string(),
            label: cell(self.label)?.to_string(),
            split: cell(self.split)?.to_string(),
            batch_idx: cell(self.batch_idx)?.parse().ok()?,
            archive_idx: cell(self.archive_idx)?.parse().ok()?,
        })
    }
}

/// Parse manifest CSV text.
///
/// Fails only when the header itself is unusable (empty input or a missing
/// required column); individual bad rows are skipped.
pub fn parse_manifest(content: &str) -> Result<ParsedManifest, CoreError> {
    let mut lines = content
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| CoreError::Validation("Manifest is empty".to_string()))?;
    let columns = ColumnMap::from_header(header)?;

    let mut parsed = ParsedManifest::default();
    for line in lines {
        match columns.parse_row(line) {
            Some(row) => parsed.rows.push(row),
            None => parsed.skipped_rows += 1,
        }
    }

    Ok(parsed)
}
