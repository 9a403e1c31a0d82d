use clap::Parser;
use sweep_cli::{run, Args};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for --dry_run output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let summary = run(&args)?;

    tracing::info!(
        sweep = %summary.sweep_id,
        "Sweep finished: {} jobs submitted",
        summary.jobs_submitted
    );
    Ok(())
}
