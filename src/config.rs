use clap::Parser;
use std::path::PathBuf;

use crate::batch::BatchConfig;
use crate::output::{OutputPaths, DEFAULT_OUTPUT};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Aggregate weighted food-insecurity prevalence from <country>/<year> survey workbooks"
)]
pub struct Args {
    /// Root directory with one subdirectory per country.
    #[arg(env = "FOODSEC_ROOT")]
    pub root: PathBuf,

    /// Aggregated xlsx output.
    #[arg(short, long, env = "FOODSEC_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Survey-file extension to look for in each year directory.
    #[arg(long, default_value = "xlsx")]
    pub extension: String,

    /// Stop at the first survey file that fails; nothing is written.
    #[arg(long)]
    pub fail_fast: bool,

    /// Also write the aggregated table as Parquet.
    #[arg(long)]
    pub parquet: Option<PathBuf>,

    /// Write a JSON run summary (per-file counts, failures, skipped dirs).
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl Args {
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            root: self.root.clone(),
            extension: self.extension.trim_start_matches('.').to_string(),
            fail_fast: self.fail_fast,
        }
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths {
            xlsx: self.output.clone(),
            parquet: self.parquet.clone(),
            summary: self.summary.clone(),
        }
    }
}
