//! scribe - CLI entry point.

use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use scribe::config::{
    API_BASE_ENV, API_KEY_ENV, DEFAULT_API_BASE, DEFAULT_MODEL, LOG_ENV, MODEL_ENV,
};
use scribe::git::ensure_git_installed;
use scribe::workflow::{self, Outcome, locate_repository};
use scribe::{LineConsole, OpenAiClient, RunMode, Settings, SystemGit, TerminalConsole};

/// Generate commit messages for staged changes using an LLM.
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(about = "Generate commit messages for staged changes using an LLM")]
#[command(version)]
struct Cli {
    /// File to generate a commit message for (ignored with -r)
    file: Option<String>,

    /// API key for the text-generation endpoint (required). The default
    /// model is gpt-4o-mini, so this is an OpenAI API key
    #[arg(long = "api-key", env = API_KEY_ENV, hide_env_values = true)]
    api_key: String,

    /// Generate a message for every staged file and choose which to commit
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Model to use
    #[arg(long, env = MODEL_ENV, default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the chat completions API
    #[arg(long = "api-base", env = API_BASE_ENV, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings::new(&self.api_key)
            .with_model(&self.model)
            .with_api_base(&self.api_base)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let settings = cli.settings();
    debug!("{:?}", settings);

    // Step 1: Decide what to work on
    let mode = RunMode::from_args(cli.file, cli.recursive)?;
    if let RunMode::Recursive = mode {
        debug!("Recursive mode; file argument ignored");
    }

    // Step 2: Check prerequisites
    ensure_git_installed()?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let repo = locate_repository(&SystemGit::new(&cwd)).await?;

    // Step 3: Generate and commit, running git from the repository root
    let git = Arc::new(SystemGit::new(&repo.root));
    let generator = Arc::new(OpenAiClient::new(settings).context("Failed to build HTTP client")?);

    let outcome = if io::stdin().is_terminal() {
        let mut console = TerminalConsole;
        workflow::run(&repo, mode, git, generator, &mut console).await?
    } else {
        let mut console = LineConsole::new(io::stdin().lock(), io::stdout());
        workflow::run(&repo, mode, git, generator, &mut console).await?
    };

    debug!("Finished: {:?}", outcome);
    Ok(outcome)
}

/// Install the stderr log subscriber.
///
/// `SCRIBE_LOG` takes a filter directive; otherwise only warnings are shown,
/// or debug output for this crate with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "scribe=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
