use anyhow::{Context, Result};
use arrow::{
    array::{Array, ArrayRef, BooleanArray, Float64Array, Float64Builder},
    compute::filter_record_batch,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{path::Path, sync::Arc};

use super::error::SurveyError;
use super::raw_sheet::RawSheet;
use super::utils::parse_numeric_cell;

pub const WT: &str = "wt";
pub const N_ADULTS: &str = "N_adults";
pub const N_CHILD: &str = "N_child";
pub const PROB_MOD_SEV: &str = "Prob_Mod_Sev";
pub const PROB_SEV: &str = "Prob_sev";

/// Columns every survey sheet must carry, in validation order.
pub const REQUIRED_COLUMNS: [&str; 5] = [WT, N_ADULTS, N_CHILD, PROB_MOD_SEV, PROB_SEV];

/// The five required columns as nullable f64; null marks a missing or unparseable cell.
pub fn survey_schema() -> Schema {
    Schema::new(
        REQUIRED_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, true))
            .collect::<Vec<_>>(),
    )
}

/// Locate each required column, failing on the first one that is absent.
pub fn required_column_indices(sheet: &RawSheet, file: &Path) -> Result<[usize; 5], SurveyError> {
    let mut indices = [0usize; 5];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = sheet
            .column_index(column)
            .ok_or_else(|| SurveyError::MissingColumn {
                file: file.to_path_buf(),
                column,
            })?;
    }
    Ok(indices)
}

/// Project the required columns out of `sheet` and coerce every cell to f64.
/// Cells that cannot be coerced become nulls; nothing here is a hard failure
/// besides a missing column.
pub fn coerce_required_columns(sheet: &RawSheet, file: &Path) -> Result<RecordBatch> {
    let indices = required_column_indices(sheet, file)?;

    let mut columns = Vec::with_capacity(indices.len());
    for idx in indices {
        let mut b = Float64Builder::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            b.append_option(row.get(idx).and_then(parse_numeric_cell));
        }
        columns.push(Arc::new(b.finish()) as ArrayRef);
    }

    RecordBatch::try_new(Arc::new(survey_schema()), columns)
        .with_context(|| format!("building survey batch for {}", file.display()))
}

/// Keep only rows where every column is non-null.
pub fn drop_incomplete_rows(batch: &RecordBatch) -> Result<RecordBatch> {
    let mask: BooleanArray = (0..batch.num_rows())
        .map(|i| Some(batch.columns().iter().all(|c| c.is_valid(i))))
        .collect();
    filter_record_batch(batch, &mask).context("filtering incomplete survey rows")
}

/// Borrow a named f64 column from a survey batch.
pub fn f64_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .with_context(|| format!("survey batch has no f64 column `{}`", name))
}
