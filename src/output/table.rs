use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Builder, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::batch::TaggedResult;

/// Rate columns of the aggregated table, in order.
pub const RATE_COLUMNS: [&str; 6] = [
    "F_mod_sev_ad",
    "F_sev_ad",
    "F_mod_sev_child",
    "F_sev_child",
    "F_mod_sev_tot",
    "F_sev_tot",
];

pub fn results_schema() -> Schema {
    let mut fields: Vec<Field> = RATE_COLUMNS
        .iter()
        .map(|name| Field::new(*name, DataType::Float64, true))
        .collect();
    fields.push(Field::new("country", DataType::Utf8, false));
    fields.push(Field::new("year", DataType::Utf8, false));
    Schema::new(fields)
}

/// One row per tagged result; undefined rates become nulls.
pub fn results_to_batch(results: &[TaggedResult]) -> Result<RecordBatch> {
    let mut rate_builders: Vec<Float64Builder> = RATE_COLUMNS
        .iter()
        .map(|_| Float64Builder::with_capacity(results.len()))
        .collect();
    for r in results {
        for (b, rate) in rate_builders.iter_mut().zip(r.result.prevalence.rates()) {
            b.append_option(rate);
        }
    }

    let mut columns: Vec<ArrayRef> = rate_builders
        .into_iter()
        .map(|mut b| Arc::new(b.finish()) as ArrayRef)
        .collect();
    columns.push(Arc::new(StringArray::from_iter_values(
        results.iter().map(|r| r.country.as_str()),
    )));
    columns.push(Arc::new(StringArray::from_iter_values(
        results.iter().map(|r| r.year.as_str()),
    )));

    RecordBatch::try_new(Arc::new(results_schema()), columns)
        .context("building aggregated results batch")
}
