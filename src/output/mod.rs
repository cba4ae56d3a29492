pub mod parquet_mirror;
pub mod summary;
pub mod table;
pub mod xlsx;

use anyhow::{Context, Result};
use std::{fs, path::Path, path::PathBuf};
use tracing::info;

use crate::batch::BatchReport;
pub use table::{results_schema, results_to_batch, RATE_COLUMNS};

pub const DEFAULT_OUTPUT: &str = "aggregated_results.xlsx";

/// Where a finished report gets written.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub xlsx: PathBuf,
    pub parquet: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            xlsx: PathBuf::from(DEFAULT_OUTPUT),
            parquet: None,
            summary: None,
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display())),
        _ => Ok(()),
    }
}

/// Write every configured output for `report`.
pub fn write_outputs(report: &BatchReport, paths: &OutputPaths) -> Result<()> {
    let batch = results_to_batch(&report.results)?;

    ensure_parent(&paths.xlsx)?;
    xlsx::write_results_xlsx(&batch, &report.failures, &paths.xlsx)?;
    info!(path = %paths.xlsx.display(), rows = batch.num_rows(), "wrote results workbook");

    if let Some(p) = &paths.parquet {
        ensure_parent(p)?;
        parquet_mirror::write_results_parquet(&batch, p)?;
        info!(path = %p.display(), "wrote results parquet");
    }

    if let Some(p) = &paths.summary {
        ensure_parent(p)?;
        summary::write_summary_json(report, p)?;
        info!(path = %p.display(), "wrote run summary");
    }

    Ok(())
}
