use std::path::PathBuf;
use thiserror::Error;

/// Structural problems with a survey workbook. Any of these stops processing of that file.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("column `{column}` is missing from {}", .file.display())]
    MissingColumn { file: PathBuf, column: &'static str },

    #[error("first worksheet of {} is empty", .file.display())]
    EmptySheet { file: PathBuf },
}
