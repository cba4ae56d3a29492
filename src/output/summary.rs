use anyhow::{Context, Result};
use std::{fs::File, io::BufWriter, path::Path};

use crate::batch::BatchReport;

/// Pretty-printed JSON of the whole report: timings, per-file rates and row
/// counts, failures and skipped directories.
pub fn write_summary_json(report: &BatchReport, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating summary file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("writing summary to {}", path.display()))?;
    Ok(())
}
