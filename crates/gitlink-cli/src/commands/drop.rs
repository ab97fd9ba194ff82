use anyhow::{Context, Result};
use gitlink_config::GitLinkConfig;
use gitlink_core::{
    DragAction, DragContext, EventDisposition, GitNoteAddin, MemoryBuffer, TagRegistry,
};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::StderrNotifier;
use crate::cli::OutputFormat;

/// Drag source stand-in offering a single target
struct ReplayDrag {
    target: String,
}

impl DragContext for ReplayDrag {
    fn offered_targets(&self) -> Vec<String> {
        vec![self.target.clone()]
    }

    fn request_data(&mut self, target: &str) {
        debug!(target, "Drop target requested payload");
    }

    fn set_action(&mut self, action: DragAction) {
        debug!(?action, "Drop target chose action");
    }

    fn finish(&mut self, success: bool) {
        debug!(success, "Drag finished");
    }
}

/// Note content and links after a replayed drop
#[derive(Debug, Serialize)]
pub struct DropReport {
    pub handled: bool,
    pub text: String,
    pub links: Vec<LinkReport>,
}

#[derive(Debug, Serialize)]
pub struct LinkReport {
    pub repo_path: String,
    pub treeish: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl DropReport {
    pub fn from_buffer(buffer: &MemoryBuffer, disposition: EventDisposition) -> Self {
        let links = buffer
            .tags()
            .iter()
            .map(|tag| LinkReport {
                repo_path: tag.link.repository_path().display().to_string(),
                treeish: tag.link.treeish().to_string(),
                start: tag.range.start,
                end: tag.range.end,
                text: buffer.slice(tag.range.clone()),
            })
            .collect();
        Self {
            handled: disposition.is_handled(),
            text: buffer.text().to_string(),
            links,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = self.text.clone();
        if !out.ends_with('\n') {
            out.push('\n');
        }
        for link in &self.links {
            out.push_str(&format!(
                "[{}..{}] {} -> {} @ {}\n",
                link.start, link.end, link.text, link.treeish, link.repo_path
            ));
        }
        out
    }
}

pub async fn execute(
    config: GitLinkConfig,
    payload: Option<PathBuf>,
    text: String,
    x: i32,
    y: i32,
    format: OutputFormat,
) -> Result<()> {
    let data = match payload {
        Some(path) => std::fs::read(&path)
            .with_context(|| format!("Failed to read payload: {}", path.display()))?,
        None => {
            let mut data = Vec::new();
            std::io::stdin()
                .read_to_end(&mut data)
                .context("Failed to read payload from stdin")?;
            data
        }
    };

    let report = replay(config, &data, text, x, y).await;
    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Run one drag-over/drop cycle against an in-memory note
pub async fn replay(
    config: GitLinkConfig,
    data: &[u8],
    text: String,
    x: i32,
    y: i32,
) -> DropReport {
    let mut drag = ReplayDrag {
        target: config.drag.target.clone(),
    };
    let mut addin = GitNoteAddin::new(config, TagRegistry::new(), Arc::new(StderrNotifier));
    addin.initialize();

    let mut buffer = MemoryBuffer::with_text(text);
    addin.on_drag_over(&mut drag);
    let outcome = addin.on_drop(&mut drag, &buffer, x, y, Some(data));
    if let Some(pending) = outcome.pending {
        let resolved = pending.resolve().await;
        addin.finish_drop(resolved, &mut buffer);
    }

    DropReport::from_buffer(&buffer, outcome.disposition)
}
