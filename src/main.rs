mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries protocol messages, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wb_navigator=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { root } => {
            cli::serve(&root).await?;
        }
        Commands::Index { path, format } => {
            cli::index_workspace(&path, &format)?;
        }
        Commands::Usages { identifier, root } => {
            cli::find_usages(&root, &identifier)?;
        }
    }

    Ok(())
}
