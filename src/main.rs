use anyhow::{Context, Result};
use clap::Parser;
use hostsync::{cli::Args, hosts, refresh};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = args.to_config().context("Invalid configuration")?;
    let base = program_dir()?;

    let runner = refresh::pipeline(&config);
    let refreshed = refresh::refresh_file(&config, &base, &runner).await?;

    if args.print {
        print!("{}", hosts::render(&refreshed.lines));
    }

    info!(
        input = %refreshed.input.display(),
        output = %refreshed.output.display(),
        resolved = refreshed.summary.resolved,
        unresolved = refreshed.summary.unresolved,
        "hosts refreshed"
    );
    Ok(())
}

/// Directory holding the executable; relative config paths anchor here.
fn program_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot determine program location")?;
    let dir = exe
        .parent()
        .context("Program path has no parent directory")?
        .to_path_buf();
    Ok(dir)
}
