//! CLI output formatting utilities.

use crate::orchestrator::RunSummary;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Print the per-composition results of a run.
    pub fn run_summary(summary: &RunSummary) {
        Output::header("Summary");
        for outcome in &summary.outcomes {
            match outcome {
                Ok(report) => {
                    let video = report
                        .video_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "no video (empty playlist)".to_string());
                    println!(
                        "  {} {} ({} clips) {}",
                        style("✓").green(),
                        style(&report.title).bold(),
                        report.clips,
                        style(video).dim()
                    );
                }
                Err(failure) => {
                    println!(
                        "  {} {} - failed while {}",
                        style("✗").red(),
                        style(&failure.title).bold(),
                        failure.step
                    );
                    println!("    {} {}", style("→").dim(), style(&failure.error).dim());
                }
            }
        }
        println!();
        Output::kv("Succeeded", &summary.succeeded().to_string());
        Output::kv("Failed", &summary.failed().to_string());
    }
}
