use anyhow::Result;
use clap::Parser;
use cukegen_cli::{run, Cli, Settings};
use cukegen_core::UnclassifiedPolicy;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides --verbose
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from(cli);
    let report = run(&settings).await?;

    if !report.written {
        print!("{}", report.rendered);
    } else if report.plan.unclassified > 0
        && settings.options.unclassified == UnclassifiedPolicy::Emit
    {
        info!(
            "{} steps had no recognised keyword and were generated without one in {}",
            report.plan.unclassified,
            report.destination.display()
        );
    }

    Ok(())
}
