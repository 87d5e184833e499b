//! Ledgerly build coordinator.
//!
//! Runs the build command in `backend/` and `frontend/` concurrently. If
//! either fails the other is killed and the process exits non-zero; if both
//! succeed `frontend/dist` is published to `.output/dist`.
//!
//! Usage: ledgerly-build [--root <DIR>] [--command <CMD>]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ledgerly_build::config::DEFAULT_COMMAND;
use ledgerly_build::{BuildConfig, run};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ledgerly-build", version, about = "Build backend and frontend together")]
struct Cli {
    /// Project root containing `backend/` and `frontend/`.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Command run in each project directory.
    #[arg(long, default_value = DEFAULT_COMMAND)]
    command: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerly_build=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match build(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn build(cli: &Cli) -> anyhow::Result<()> {
    let config = BuildConfig::standard(&cli.root, &cli.command)?;
    let report = run(&config, std::io::stdout()).await?;
    tracing::info!(
        files = report.files_published,
        output = %config.published_dir().display(),
        "Build complete"
    );
    Ok(())
}
