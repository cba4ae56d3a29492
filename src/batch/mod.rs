// src/batch/mod.rs

pub mod discover;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::survey::{process_survey_file, FileResult};
pub use discover::{discover_survey_files, Discovery, SurveyFile};

/// Inputs to one aggregation run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory holding one subdirectory per country.
    pub root: PathBuf,
    /// Survey-file extension, without the dot.
    pub extension: String,
    /// Abort on the first file that fails instead of recording it and moving on.
    pub fail_fast: bool,
}

impl BatchConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "xlsx".to_string(),
            fail_fast: false,
        }
    }
}

/// A file result tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedResult {
    pub country: String,
    pub year: String,
    pub file: PathBuf,
    #[serde(flatten)]
    pub result: FileResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub country: String,
    pub year: String,
    pub file: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<TaggedResult>,
    pub failures: Vec<FileFailure>,
    /// Year directories that held no survey file.
    pub skipped: Vec<PathBuf>,
}

/// Process every `<country>/<year>` survey under `config.root`.
///
/// Directory errors always abort. File errors abort only with `fail_fast`;
/// otherwise they are collected in [`BatchReport::failures`].
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    let started_at = Utc::now();
    let start = Instant::now();
    info!(root = %config.root.display(), "scanning survey directories");

    let Discovery { files, empty_dirs } = discover_survey_files(&config.root, &config.extension)?;
    info!(
        files = files.len(),
        skipped = empty_dirs.len(),
        "survey files discovered"
    );

    let mut results = Vec::with_capacity(files.len());
    let mut failures = Vec::new();

    for SurveyFile {
        country,
        year,
        path,
    } in files
    {
        info!(country = %country, year = %year, file = %path.display(), "processing");
        match process_survey_file(&path) {
            Ok(result) => results.push(TaggedResult {
                country,
                year,
                file: path,
                result,
            }),
            Err(err) if config.fail_fast => {
                return Err(err.context(format!(
                    "processing {}/{} ({})",
                    country,
                    year,
                    path.display()
                )));
            }
            Err(err) => {
                error!(country = %country, year = %year, "failed: {:#}", err);
                failures.push(FileFailure {
                    country,
                    year,
                    file: path,
                    error: format!("{:#}", err),
                });
            }
        }
    }

    if !failures.is_empty() {
        warn!(
            failed = failures.len(),
            succeeded = results.len(),
            "some survey files could not be processed"
        );
    }
    info!(elapsed = ?start.elapsed(), rows = results.len(), "batch complete");

    Ok(BatchReport {
        root: config.root.clone(),
        started_at,
        finished_at: Utc::now(),
        results,
        failures,
        skipped: empty_dirs,
    })
}
