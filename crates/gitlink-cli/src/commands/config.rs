use anyhow::{Context, Result};
use gitlink_config::GitLinkConfig;

pub fn execute(config: &GitLinkConfig) -> Result<()> {
    let rendered = config
        .to_toml()
        .context("Failed to serialize config as TOML")?;
    print!("{}", rendered);
    Ok(())
}
