use anyhow::{Context, Result};
use clap::Parser;
use gitlink_cli::{
    cli::{Cli, Commands},
    commands,
};
use gitlink_config::GitLinkConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG still takes precedence when set
    let env_filter = EnvFilter::builder()
        .with_default_directive(cli.level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = GitLinkConfig::load(cli.config.clone()).context("Failed to load configuration")?;
    debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Resolve { repo, treeish } => {
            commands::resolve::execute(&config, repo, treeish).await
        }
        Commands::Open { repo, treeish } => commands::open::execute(&config, repo, treeish),
        Commands::Drop {
            payload,
            text,
            x,
            y,
            format,
        } => commands::drop::execute(config, payload, text, x, y, format).await,
        Commands::Config => commands::config::execute(&config),
    }
}
