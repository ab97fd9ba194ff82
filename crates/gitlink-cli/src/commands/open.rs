use anyhow::Result;
use gitlink_config::GitLinkConfig;
use gitlink_core::{LinkActivator, LinkTagType, TagRegistry};
use std::path::PathBuf;
use std::sync::Arc;

use super::{target_from_args, StderrNotifier};

pub fn execute(config: &GitLinkConfig, repo: PathBuf, treeish: String) -> Result<()> {
    let registry = TagRegistry::new();
    registry.register(LinkTagType::from_config(&config.tag));
    let link = registry.create(&config.tag.name, target_from_args(repo, treeish)?)?;

    let activator = LinkActivator::from_config(&config.browser, Arc::new(StderrNotifier));
    activator.activate(&link);
    Ok(())
}
