//! Splice CLI entry point.

use anyhow::Result;
use clap::Parser;
use splice::cli::{preflight, Cli, Output};
use splice::config::Settings;
use splice::corpus::Corpus;
use splice::orchestrator::Orchestrator;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(path))?,
        None => Settings::load()?,
    };
    cli.apply_overrides(&mut settings);

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("splice={}", cli.log_level(&settings))),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if !cli.skip_preflight {
        if let Err(e) = preflight::check_ffmpeg(&settings.ffmpeg_path()) {
            Output::error(&e.to_string());
            Output::info(preflight::FFMPEG_INSTALL_HINT);
            return Err(e.into());
        }
    }

    info!("Corpus path: {}", cli.corpus.display());
    let corpus = match Corpus::load(&cli.corpus) {
        Ok(corpus) => corpus,
        Err(e) => {
            Output::error(&e.to_string());
            return Err(e.into());
        }
    };

    Output::info(&format!(
        "{} compositions to process",
        corpus.compositions().len()
    ));

    let orchestrator = Orchestrator::new(&settings).with_progress(Output::spinner("Assembling..."));
    let summary = orchestrator.run(&corpus).await;

    Output::run_summary(&summary);

    if summary.is_success() {
        Output::success("All done");
        Ok(())
    } else {
        anyhow::bail!("{} of {} compositions failed", summary.failed(), summary.outcomes.len())
    }
}
