//! Mtwatch CLI: watchfolder service for MT-provider compliance checking.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use snafu::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::info;

use mtwatch::error::TaskJoinSnafu;
use mtwatch::{
    init_tracing, run_watcher, shutdown_signal, Config, PipelineContext, PipelineError,
};

#[derive(Debug, Parser)]
#[command(name = "mtwatch", about = "Watchfolder service that flags blacklisted MT providers")]
struct CliArgs {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    init_tracing();

    let args = CliArgs::parse();

    let config = Config::from_file(&args.config)?;

    info!(
        "Starting mtwatch over {} project director(ies)",
        config.directories.project_dirs.len()
    );

    let ctx = Arc::new(PipelineContext::new(Arc::new(config)));
    let shutdown = CancellationToken::new();

    let watcher = tokio::spawn(run_watcher(ctx, shutdown.clone()));

    shutdown_signal().await;
    shutdown.cancel();

    watcher.await.context(TaskJoinSnafu)?;

    Ok(())
}
