//! Revision summary resolution.
//!
//! Link text prefers the one-line log summary of a revision over its raw id.
//! Any failure along the way (git missing, bad revision, empty output,
//! timeout) yields [`Resolution::Unresolved`] and the caller shows the raw id.

use crate::tag::validate_treeish;
use async_trait::async_trait;
use gitlink_config::ResolverConfig;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Outcome of resolving one revision id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A non-empty one-line summary
    Resolved(String),
    /// No summary available; show the raw revision id
    Unresolved,
}

impl Resolution {
    /// Text to insert for `treeish`
    pub fn display_text(self, treeish: &str) -> String {
        match self {
            Self::Resolved(summary) => summary,
            Self::Unresolved => treeish.to_string(),
        }
    }

    /// True if a summary was found
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Looks up a human-readable label for a revision
#[async_trait]
pub trait SummaryResolver: Send + Sync {
    /// Resolve `treeish` within the repository at `repository_path`.
    ///
    /// Never fails; every problem becomes [`Resolution::Unresolved`].
    async fn resolve(&self, repository_path: &Path, treeish: &str) -> Resolution;
}

/// Resolves summaries with `git log --oneline <rev>^..<rev>`
#[derive(Debug, Clone)]
pub struct GitLogResolver {
    program: String,
    timeout: Duration,
}

impl GitLogResolver {
    /// Create a resolver running `program` with a per-revision timeout
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Create a resolver from the `[resolver]` config section
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.program.clone(), config.timeout())
    }

    /// Per-revision timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, repository_path: &Path, treeish: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("log")
            .arg("--oneline")
            .arg("--end-of-options")
            .arg(format!("{treeish}^..{treeish}"))
            .current_dir(repository_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

impl Default for GitLogResolver {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}

#[async_trait]
impl SummaryResolver for GitLogResolver {
    async fn resolve(&self, repository_path: &Path, treeish: &str) -> Resolution {
        if let Err(e) = validate_treeish(treeish) {
            warn!(treeish, error = %e, "Refusing to query summary");
            return Resolution::Unresolved;
        }
        let mut command = self.command(repository_path, treeish);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                debug!(program = %self.program, error = %e, "Failed to run summary query");
                return Resolution::Unresolved;
            }
            Err(_) => {
                warn!(
                    treeish,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Summary query timed out"
                );
                return Resolution::Unresolved;
            }
        };

        if !output.status.success() {
            debug!(treeish, status = %output.status, "Summary query failed");
            return Resolution::Unresolved;
        }

        // A merge lists the merged commits too; its own summary comes first.
        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.trim().lines().next().map(str::trim) {
            Some(summary) if !summary.is_empty() => {
                debug!(treeish, summary, "Resolved revision summary");
                Resolution::Resolved(summary.to_string())
            }
            _ => {
                debug!(treeish, "Summary query produced no output");
                Resolution::Unresolved
            }
        }
    }
}

/// Resolver that never looks anything up; links show raw revision ids
#[derive(Debug, Clone, Copy, Default)]
pub struct RawIdResolver;

#[async_trait]
impl SummaryResolver for RawIdResolver {
    async fn resolve(&self, _repository_path: &Path, _treeish: &str) -> Resolution {
        Resolution::Unresolved
    }
}
