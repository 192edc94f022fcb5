use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobfit_matcher::config::Config;
use jobfit_matcher::document::{load_document, normalize_whitespace};
use jobfit_matcher::{MatchEngine, Vocabulary};

/// Score a resume against a job description.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Resume file (.pdf or plain text)
    resume: PathBuf,

    /// Job description file (.pdf or plain text)
    #[arg(required_unless_present = "job_text", conflicts_with = "job_text")]
    job: Option<PathBuf>,

    /// Job description given inline instead of as a file
    #[arg(long)]
    job_text: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = Config::from_env()?;

    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("jobfit_matcher={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting jobfit-matcher v{}", env!("CARGO_PKG_VERSION"));

    let vocabulary = match &config.vocabulary_path {
        Some(path) => {
            info!("Loading vocabulary from {}", path.display());
            Arc::new(Vocabulary::from_path(path)?)
        }
        None => Vocabulary::builtin(),
    };

    let engine = MatchEngine::from_config(&config, vocabulary)?;

    let resume_text = load_document(&args.resume)?;
    let job_text = match (&args.job, &args.job_text) {
        (Some(path), _) => load_document(path)?,
        (None, Some(text)) => normalize_whitespace(text),
        (None, None) => anyhow::bail!("a job description file or --job-text is required"),
    };

    let result = engine.perform_match(&resume_text, &job_text).await;

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("Failed to serialize match result")?;
    println!("{json}");

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
