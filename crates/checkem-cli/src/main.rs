mod preflight;
mod report;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context};
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use checkem_core::{Config, Orchestrator};

/// Runner location used when neither `--root` nor `CHECKEM_ROOT` is set.
const DEFAULT_ROOT_UNDER_HOME: &str = "dev/ops/apps/runner";

#[derive(Parser)]
#[command(
    name = "checkem",
    version,
    about = "checkem — validate a board's search-index mappings against schemas and metadata"
)]
struct Cli {
    /// Board whose mappings are validated
    board: String,

    /// Runner root holding resources/, metadata/ and mappings/
    #[arg(long, env = "CHECKEM_ROOT")]
    root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/checkem.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: human (default) or json
    #[arg(long, default_value = "human")]
    format: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Usage: checkem <board name>");
            process::exit(1);
        }
    };

    match run(&cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<i32> {
    let root = resolve_root(cli.root.as_deref())?;
    let config = match &cli.config {
        Some(path) => Config::load(path, &root)?,
        None => Config::discover(&root)?,
    };

    preflight::check_board_files(&config, &cli.board);

    let report = Orchestrator::new(config, cli.board.clone())
        .run()
        .await
        .with_context(|| format!("validating board {}", cli.board))?;

    print!("{}", report::render(&report, &cli.format)?);
    Ok(report.exit_code())
}

fn resolve_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    match std::env::var_os("HOME") {
        Some(home) => Ok(PathBuf::from(home).join(DEFAULT_ROOT_UNDER_HOME)),
        None => bail!("HOME is not set; pass --root or set CHECKEM_ROOT"),
    }
}
