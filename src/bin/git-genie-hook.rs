//! git-genie-hook - writes a generated message into a commit-message file.
//!
//! Install as a `prepare-commit-msg` hook; git passes the message file as
//! the first argument.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use git_genie::commit::NO_CHANGES_NOTICE;
use git_genie::logging::init_tracing;
use git_genie::{GenieConfig, HookOutcome, LlmRouter, RepoDiffSource, Reporter, run_hook};

/// Rewrite a commit-message file with a message generated from the staged diff.
#[derive(Parser, Debug)]
#[command(name = "git-genie-hook")]
#[command(version)]
struct Cli {
    /// Commit message files; only the first is used
    #[arg(required = true)]
    filenames: Vec<PathBuf>,

    /// `append` keeps the typed message above the generated one, `replace` drops it
    #[arg(
        long,
        num_args = 0..=1,
        default_value = "append",
        default_missing_value = "append"
    )]
    mode: String,

    /// Print debug logs to stderr
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = GenieConfig::from_env().context("Invalid configuration")?;
    let mut router = LlmRouter::new(config.selection(), config.openai.clone());
    let diff_source = RepoDiffSource::new(".");

    // clap guarantees at least one filename
    let Some(path) = cli.filenames.first() else {
        return Ok(());
    };

    let outcome = run_hook(
        path,
        &cli.mode,
        &diff_source,
        &mut router,
        &config.composer(),
    )
    .await
    .with_context(|| format!("Failed to update {}", path.display()))?;

    let mut reporter = Reporter::stdout(false);
    match outcome {
        HookOutcome::NoChanges => reporter.notice(NO_CHANGES_NOTICE)?,
        HookOutcome::Updated { message } => {
            reporter.command("Generated commit message:", &message)?
        }
    }
    Ok(())
}
