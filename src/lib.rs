//! Weighted food-insecurity prevalence over `<country>/<year>` survey workbooks.

pub mod batch;
pub mod config;
pub mod output;
pub mod survey;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{run_batch, BatchConfig, BatchReport, FileFailure, TaggedResult};
pub use output::{write_outputs, OutputPaths};
pub use survey::{process_survey_file, FileResult, Prevalence, SurveyError};
