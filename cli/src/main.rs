mod backend;
mod config;
mod error;
mod replay;
mod script;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use review::config::EngineConfig;
use review::coords::Size;
use review::layout::{CompareMode, LayoutSolver};
use tracing_subscriber::EnvFilter;

use crate::config::ReviewConfig;
use crate::error::CliError;
use crate::script::Script;

#[derive(Parser, Debug)]
#[command(name = "review-cli", about = "Headless harness for the review canvas engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded session script against a simulated backend.
    Replay(ReplayArgs),
    /// Print the compositor layout for a viewport.
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Script path, or - for stdin.
    script: PathBuf,

    /// Engine tunables as JSON; replaces the REVIEW_* engine variables.
    #[arg(long)]
    engine_config: Option<PathBuf>,

    #[arg(long)]
    latency_ms: Option<u64>,

    /// Fail every Nth backend attempt (0 = never).
    #[arg(long)]
    fail_every: Option<u64>,

    #[arg(long)]
    resize_retries: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutMode {
    SplitHorizontal,
    SplitVertical,
    Overlay,
}

impl From<LayoutMode> for CompareMode {
    fn from(mode: LayoutMode) -> Self {
        match mode {
            LayoutMode::SplitHorizontal => CompareMode::SplitHorizontal,
            LayoutMode::SplitVertical => CompareMode::SplitVertical,
            LayoutMode::Overlay => CompareMode::Overlay,
        }
    }
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[arg(long, value_enum, default_value = "split-horizontal")]
    mode: LayoutMode,

    #[arg(long, default_value_t = review::consts::DEFAULT_SPLIT_RATIO)]
    ratio: f64,

    #[arg(long)]
    width: f64,

    #[arg(long)]
    height: f64,

    /// Primary video aspect ratio (width / height).
    #[arg(long)]
    aspect: Option<f64>,

    /// Comparison video aspect ratio; defaults to the primary's.
    #[arg(long)]
    comparison_aspect: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Load .env before the filter reads RUST_LOG. A missing file is fine.
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "ignoring .env");
        }
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Replay(args) => run_replay(args).await,
        Command::Layout(args) => run_layout(&args),
    }
}

fn read_input(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        return io::read_to_string(io::stdin()).map_err(|source| CliError::Read { path: path.to_path_buf(), source });
    }
    std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

async fn run_replay(args: ReplayArgs) -> Result<(), CliError> {
    let mut config = ReviewConfig::from_env();
    if let Some(path) = &args.engine_config {
        config.engine = EngineConfig::from_json(&read_input(path)?)?;
    }
    if let Some(latency_ms) = args.latency_ms {
        config.backend.latency_ms = latency_ms;
    }
    if let Some(fail_every) = args.fail_every {
        config.backend.fail_every = fail_every;
    }
    if let Some(resize_retries) = args.resize_retries {
        config.backend.resize_retries = resize_retries;
    }

    let script = Script::from_json(&read_input(&args.script)?)?;
    tracing::info!(
        script = %args.script.display(),
        duration_ms = script.duration_ms(),
        latency_ms = config.backend.latency_ms,
        fail_every = config.backend.fail_every,
        "replaying session"
    );

    let mut stdout = io::stdout().lock();
    replay::run(script, config, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}

fn run_layout(args: &LayoutArgs) -> Result<(), CliError> {
    let layout = LayoutSolver::solve(
        args.mode.into(),
        args.ratio,
        Size::new(args.width, args.height),
        args.aspect,
        args.comparison_aspect.or(args.aspect),
    );
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &layout)?;
    writeln!(stdout)?;
    Ok(())
}
