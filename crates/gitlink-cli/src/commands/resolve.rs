use anyhow::Result;
use gitlink_config::GitLinkConfig;
use gitlink_core::{GitLogResolver, RawIdResolver, SummaryResolver};
use std::path::PathBuf;

use super::target_from_args;

pub async fn execute(config: &GitLinkConfig, repo: PathBuf, treeish: String) -> Result<()> {
    let target = target_from_args(repo, treeish)?;
    let resolver: Box<dyn SummaryResolver> = if config.resolver.enabled {
        Box::new(GitLogResolver::from_config(&config.resolver))
    } else {
        Box::new(RawIdResolver)
    };

    let resolution = resolver
        .resolve(target.repository_path(), target.treeish())
        .await;
    println!("{}", resolution.display_text(target.treeish()));
    Ok(())
}
