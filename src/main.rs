use anyhow::Result;
use clap::Parser;
use foodsec::{config::Args, output::write_outputs, run_batch};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) configuration ────────────────────────────────────────────
    let args = Args::parse();
    let config = args.batch_config();
    let outputs = args.output_paths();
    info!(root = %config.root.display(), fail_fast = config.fail_fast, "startup");

    // ─── 3) process every <country>/<year> survey ────────────────────
    let report = run_batch(&config)?;

    // ─── 4) write the aggregated table ───────────────────────────────
    write_outputs(&report, &outputs)?;

    info!(
        rows = report.results.len(),
        failed = report.failures.len(),
        "all results saved to {}",
        outputs.xlsx.display()
    );
    Ok(())
}
