// Terragen - research-grounded Terraform generation
// Main entry point

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use terragen::completion::openai::OpenAiClient;
use terragen::config::load_config;
use terragen::search::tavily::TavilyClient;
use terragen::workflow::{
    RunRequest, Snapshot, StepUpdate, Termination, WorkflowRunner,
};

#[derive(Parser, Debug)]
#[command(
    name = "terragen",
    about = "Generate a reviewed Terraform configuration from a task description",
    version
)]
struct Args {
    /// What to build, e.g. "An EC2 instance behind an ALB"
    task: String,

    /// Revision budget for the review loop
    #[arg(long)]
    max_revisions: Option<u32>,

    /// Write the final configuration to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Completion model override
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Load configuration
    let config = load_config()?;

    let completion = OpenAiClient::new(config.openai_api_key)
        .with_model(args.model.unwrap_or(config.model))
        .with_temperature(config.temperature)
        .with_timeout(Duration::from_secs(config.request_timeout_secs));
    let search = TavilyClient::new(config.tavily_api_key);

    let runner = WorkflowRunner::new(Arc::new(completion), Arc::new(search));
    let request = RunRequest::new(args.task)
        .with_max_revisions(args.max_revisions.unwrap_or(config.max_revisions));

    // Print each step as it completes while the run is still in flight
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let progress = tokio::spawn(async move {
        while let Some(snapshot) = rx.recv().await {
            print_progress(&snapshot);
        }
    });

    let report = runner.run_with_progress(request, Some(tx)).await;
    let _ = progress.await;

    match &report.outcome {
        Ok(Termination::Approved) => eprintln!("✓ Configuration approved"),
        Ok(Termination::RevisionBudgetExhausted) => {
            eprintln!("⚠ Revision budget exhausted, emitting the last draft")
        }
        Err(e) => bail!("Workflow failed: {e}"),
    }

    let code = report
        .final_code()
        .context("Run terminated without generating code")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, code)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{code}"),
    }

    Ok(())
}

fn print_progress(snapshot: &Snapshot) {
    match &snapshot.update {
        StepUpdate::Research { content } => {
            eprintln!("• Research: gathered {} snippets", content.len());
        }
        StepUpdate::Generate {
            revision_number,
            fenced,
            ..
        } => {
            if *fenced {
                eprintln!("• Generate: draft #{revision_number}");
            } else {
                eprintln!("• Generate: draft #{revision_number} (no code fence in response)");
            }
        }
        StepUpdate::Review { critique } => {
            let line = critique.lines().next().unwrap_or("");
            eprintln!("• Review: {line}");
        }
    }
}
