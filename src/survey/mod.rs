// src/survey/mod.rs

//! Per-file processing: load one survey workbook, clean it, and compute the
//! six prevalence rates.

pub mod convert;
pub mod error;
pub mod raw_sheet;
pub mod stats;
pub mod utils;

use anyhow::Result;
use std::path::Path;
use tracing::{debug, warn};

pub use convert::REQUIRED_COLUMNS;
pub use error::SurveyError;
pub use raw_sheet::{load_survey_sheet, RawSheet};
pub use stats::{FileResult, Prevalence, RowCounts};

/// Load the workbook at `path` and compute its prevalence rates.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn process_survey_file<P: AsRef<Path>>(path: P) -> Result<FileResult> {
    let path = path.as_ref();
    let sheet = load_survey_sheet(path)?;
    process_sheet(&sheet, path)
}

/// Validate, coerce, clean and summarise an already-loaded sheet.
/// `file` is only used to label errors.
pub fn process_sheet(sheet: &RawSheet, file: &Path) -> Result<FileResult> {
    // 1) required columns → nullable f64
    let raw = convert::coerce_required_columns(sheet, file)?;

    // 2) drop rows with any missing value
    let clean = convert::drop_incomplete_rows(&raw)?;

    // 3) weighted rates
    let result = stats::compute_file_result(&clean, raw.num_rows())?;

    if result.rows.dropped > 0 {
        debug!(
            dropped = result.rows.dropped,
            kept = result.rows.used,
            "dropped incomplete rows"
        );
    }

    if result.rows.non_finite_child_weight > 0 {
        warn!(
            rows = result.rows.non_finite_child_weight,
            "rows with N_adults = 0 excluded from child sums"
        );
    }
    if result.prevalence.has_undefined() {
        warn!(
            pop_ad = result.pop_ad,
            pop_child = result.pop_child,
            "some prevalence rates are undefined"
        );
    }
    Ok(result)
}
