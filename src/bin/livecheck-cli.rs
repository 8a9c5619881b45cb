use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;
use url::Url;

use livecheck::compare::{ComparisonResult, ComparisonSummary, ProbeBatchSummary};
use livecheck::config::load_config;
use livecheck::observability::logging;
use livecheck::probe::ProbeResult;
use livecheck::report::{read_report, write_report, ReportSummary};
use livecheck::script::{run_script, ScriptMode, ScriptOptions};

#[derive(Parser)]
#[command(name = "livecheck-cli")]
#[command(about = "Batch runner and client for the live-status test service", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "LIVECHECK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch locally and save the report
    Run {
        /// Comma-separated identifiers (defaults to TEST_USERS)
        #[arg(short, long, value_delimiter = ',')]
        identifiers: Vec<String>,
        /// How many times to run the list
        #[arg(short = 'n', long)]
        iterations: Option<u32>,
        /// Delay after each identifier
        #[arg(long)]
        pacing_ms: Option<u64>,
        /// Report file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also query the secondary source and compare
        #[arg(long)]
        compare: bool,
    },
    /// Print a saved report
    Show {
        path: Option<PathBuf>,
    },
    /// Query a running service
    Remote {
        #[arg(short, long, default_value = "http://localhost:8000")]
        url: String,
        #[command(subcommand)]
        command: RemoteCommand,
    },
}

#[derive(Subcommand)]
enum RemoteCommand {
    /// Service metadata
    Status,
    /// Liveness check
    Health,
    /// Single-source check
    Test { identifier: String },
    /// Dual-source comparison
    Compare { identifier: String },
    /// Raw payload and matched field
    Debug { identifier: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            identifiers,
            iterations,
            pacing_ms,
            output,
            compare,
        } => {
            logging::init_logging(&config.observability);
            let mut options = ScriptOptions::from_config(&config);
            if !identifiers.is_empty() {
                options.identifiers = identifiers;
            }
            if let Some(iterations) = iterations {
                options.iterations = iterations.max(1);
            }
            if let Some(pacing_ms) = pacing_ms {
                options.pacing_ms = pacing_ms;
            }
            let output = output.unwrap_or_else(|| PathBuf::from(&config.script.output_path));

            let mode = ScriptMode::from_config(&config, compare)?;
            run_and_save(&mode, &options, &output).await?;
        }
        Commands::Show { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(&config.script.output_path));
            let report = read_report(&path)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Remote { url, command } => {
            let client = reqwest::Client::new();
            let segments: Vec<&str> = match &command {
                RemoteCommand::Status => vec![],
                RemoteCommand::Health => vec!["health"],
                RemoteCommand::Test { identifier } => vec!["test", identifier.as_str()],
                RemoteCommand::Compare { identifier } => vec!["compare", identifier.as_str()],
                RemoteCommand::Debug { identifier } => vec!["debug", identifier.as_str()],
            };
            let res = client.get(remote_url(&url, &segments)?).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

/// Service URL with each segment percent-encoded as one path segment.
fn remote_url(base: &str, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("not a service URL: {}", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn run_and_save(
    mode: &ScriptMode,
    options: &ScriptOptions,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Identifiers: {}", options.identifiers.len());
    for identifier in &options.identifiers {
        println!("   - @{}", identifier);
    }

    let report = run_script(mode, options).await;
    let per_iteration = options.identifiers.len().max(1);

    match &report.summary {
        ReportSummary::Probe(summary) => {
            for (index, chunk) in summary.results.chunks(per_iteration).enumerate() {
                println!("\n== Iteration {}/{} ==", index + 1, report.iterations);
                chunk.iter().for_each(print_probe);
            }
            print_probe_summary(summary);
        }
        ReportSummary::Compare(summary) => {
            for (index, chunk) in summary.results.chunks(per_iteration).enumerate() {
                println!("\n== Iteration {}/{} ==", index + 1, report.iterations);
                chunk.iter().for_each(print_comparison);
            }
            print_comparison_summary(summary);
        }
    }

    write_report(output, &report)?;
    println!("\nReport saved to {}", output.display());
    Ok(())
}

fn status_line(result: &ProbeResult) -> String {
    let status = if result.succeeded { "OK  " } else { "FAIL" };
    let live = match result.is_live {
        Some(true) => "LIVE",
        Some(false) => "offline",
        None => "unknown",
    };
    let mut line = format!("{} | {:<7} | {:>6.0}ms", status, live, result.latency_ms);
    if let Some(error) = &result.error {
        line.push_str(&format!(" | {}", error));
    }
    line
}

fn print_probe(result: &ProbeResult) {
    println!("@{}: {}", result.identifier, status_line(result));
}

fn print_comparison(result: &ComparisonResult) {
    let verdict = match result.matched {
        Some(true) => "match",
        Some(false) => "MISMATCH",
        None => "n/a",
    };
    println!("@{} [{}]", result.identifier, verdict);
    println!("    primary:   {}", status_line(&result.primary));
    println!("    secondary: {}", status_line(&result.secondary));
}

fn print_probe_summary(summary: &ProbeBatchSummary) {
    let stats = &summary.stats;
    println!("\n== Summary ==");
    println!("Total:            {}", stats.total);
    println!("Succeeded:        {}", stats.success_count);
    println!("Failed:           {}", stats.failure_count);
    println!("Success rate:     {}", stats.success_rate_display());
    println!("Average latency:  {:.0}ms", stats.average_latency_ms);
    println!("Live:             {}", stats.live_count);
    println!("Offline:          {}", stats.offline_count);
}

fn print_comparison_summary(summary: &ComparisonSummary) {
    println!("\n== Summary ==");
    println!("Total:              {}", summary.total);
    println!(
        "Primary success:    {} ({:.0}ms avg)",
        summary.primary.success_rate_display(),
        summary.primary.average_latency_ms
    );
    println!(
        "Secondary success:  {} ({:.0}ms avg)",
        summary.secondary.success_rate_display(),
        summary.secondary.average_latency_ms
    );
    println!(
        "Match rate:         {:.1}% ({}/{} comparable)",
        summary.match_rate, summary.match_count, summary.comparable_count
    );
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_url_encodes_identifier() {
        let url = remote_url("http://localhost:8000", &["test", "a/b?c#d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/test/a%2Fb%3Fc%23d");

        let url = remote_url("http://localhost:8000/svc/", &["compare", "alice"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/svc/compare/alice");
    }

    #[test]
    fn test_remote_url_root() {
        let url = remote_url("http://localhost:8000", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }
}
