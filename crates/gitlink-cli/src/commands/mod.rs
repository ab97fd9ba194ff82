pub mod config;
pub mod drop;
pub mod open;
pub mod resolve;

use gitlink_core::{ErrorNotifier, LinkTarget};
use std::path::PathBuf;

/// Reports activation errors on stderr instead of a dialog
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl ErrorNotifier for StderrNotifier {
    fn notify_error(&self, title: &str, message: &str) {
        eprintln!("{}: {}", title, message);
    }
}

/// Build a link target, making a relative repository path absolute
pub(crate) fn target_from_args(repo: PathBuf, treeish: String) -> anyhow::Result<LinkTarget> {
    let repo = if repo.is_absolute() {
        repo
    } else {
        std::env::current_dir()?.join(repo)
    };
    Ok(LinkTarget::new(repo, treeish)?)
}
