use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::path::Path;
use tracing::debug;

use super::error::SurveyError;
use super::utils::header_name;

#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    /// Column names, from the first row of the worksheet.
    pub headers: Vec<String>,
    /// Every row after the header, cells untouched.
    pub rows: Vec<Vec<Data>>,
}

impl RawSheet {
    /// Index of the first column whose header equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Open `path` as an `.xlsx` workbook and read its first worksheet.
pub fn load_survey_sheet<P: AsRef<Path>>(path: P) -> Result<RawSheet> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("{} contains no worksheet", path.display()))?
        .with_context(|| format!("Failed to read first worksheet of {}", path.display()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| SurveyError::EmptySheet {
            file: path.to_path_buf(),
        })?
        .iter()
        .map(header_name)
        .collect();
    let rows: Vec<Vec<Data>> = rows.map(|r| r.to_vec()).collect();

    debug!(
        columns = headers.len(),
        rows = rows.len(),
        "loaded first worksheet"
    );
    Ok(RawSheet { headers, rows })
}
