//! git-genie - CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use git_genie::commit::SummaryChain;
use git_genie::logging::init_tracing;
use git_genie::{
    DialoguerPrompter, GenieConfig, LlmRouter, Provider, RepoDiffSource, Reporter, Session,
    SessionOptions, SystemShell,
};

/// Translate plain-English instructions into git commands.
///
/// Pass `commit` as the instruction to generate a commit message from the
/// staged changes.
#[derive(Parser, Debug)]
#[command(name = "git-genie")]
#[command(about = "Translate plain-English instructions into git commands")]
#[command(version)]
struct Cli {
    /// Human-readable git instruction, or `commit`
    instruction: String,

    /// Execute the generated git command without asking
    #[arg(short = 'x', long)]
    execute: bool,

    /// Explain the generated git command without asking
    #[arg(short, long)]
    explain: bool,

    /// Print debug logs to stderr
    #[arg(short, long)]
    debug: bool,

    /// Print only the generated git command
    #[arg(short, long)]
    quiet: bool,

    /// With `commit`, print only the generated commit message
    #[arg(short = 'j', long)]
    just_print_commit_message: bool,

    /// LLM provider to try first (default: GIT_GENIE_PROVIDER or claude)
    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// How large diffs are summarized (default: GIT_GENIE_SUMMARY_CHAIN or stuff)
    #[arg(long, value_enum)]
    summary_chain: Option<SummaryChain>,

    /// Do not prefix generated commit messages
    #[arg(long)]
    no_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = GenieConfig::from_env()
        .context("Invalid configuration")?
        .with_overrides(cli.provider, cli.summary_chain, cli.no_prefix);
    let examples = config
        .translation_examples()
        .context("Failed to load translation examples")?;

    let mut router = LlmRouter::new(config.selection(), config.openai.clone());
    if cli.debug {
        for provider in router.unavailable_providers().await {
            warn!("{} does not look available", provider);
        }
    }

    let options = SessionOptions {
        execute: cli.execute,
        explain: cli.explain,
        quiet: cli.quiet,
        just_print_commit_message: cli.just_print_commit_message,
    };

    let shell = SystemShell;
    let mut prompter = DialoguerPrompter;
    let diff_source = RepoDiffSource::new(".");
    let mut reporter = Reporter::stdout(cli.quiet || cli.just_print_commit_message);

    let outcome = Session::new(
        &mut router,
        &shell,
        &mut prompter,
        &diff_source,
        &mut reporter,
    )
    .with_composer(config.composer())
    .with_translation_examples(examples)
    .run(&cli.instruction, options)
    .await
    .context("git-genie failed")?;

    debug!("Session ended: {:?}", outcome);
    Ok(())
}
