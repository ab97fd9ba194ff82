//! End-to-end drop handling through GitNoteAddin
//!
//! These tests drive the add-in the way a host editor would: drag-over,
//! drop with raw selection data, then inspect the note buffer.

use async_trait::async_trait;
use gitlink_config::GitLinkConfig;
use gitlink_core::{
    DragAction, DragContext, DropTargets, ErrorNotifier, EventDisposition, GitNoteAddin,
    MemoryBuffer, NoteBuffer, Resolution, SummaryResolver, TagRegistry,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Resolver answering from a table, with an optional per-revision delay
#[derive(Default)]
struct TableResolver {
    answers: HashMap<String, (Duration, Resolution)>,
    calls: Mutex<Vec<String>>,
}

impl TableResolver {
    fn with(mut self, treeish: &str, delay_ms: u64, resolution: Resolution) -> Self {
        self.answers.insert(
            treeish.to_string(),
            (Duration::from_millis(delay_ms), resolution),
        );
        self
    }
}

#[async_trait]
impl SummaryResolver for TableResolver {
    async fn resolve(&self, _repository_path: &Path, treeish: &str) -> Resolution {
        self.calls.lock().push(treeish.to_string());
        match self.answers.get(treeish) {
            Some((delay, resolution)) => {
                tokio::time::sleep(*delay).await;
                resolution.clone()
            }
            None => Resolution::Unresolved,
        }
    }
}

/// Resolver that never finishes
struct HangingResolver;

#[async_trait]
impl SummaryResolver for HangingResolver {
    async fn resolve(&self, _repository_path: &Path, _treeish: &str) -> Resolution {
        std::future::pending::<()>().await;
        Resolution::Unresolved
    }
}

#[derive(Default)]
struct SilentNotifier {
    errors: Mutex<Vec<String>>,
}

impl ErrorNotifier for SilentNotifier {
    fn notify_error(&self, _title: &str, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}

#[derive(Default)]
struct RecordingTargets {
    active: Mutex<Vec<(String, u32)>>,
}

impl DropTargets for RecordingTargets {
    fn add_target(&self, target: &str, info: u32) {
        self.active.lock().push((target.to_string(), info));
    }

    fn remove_target(&self, target: &str) {
        self.active.lock().retain(|(t, _)| t != target);
    }
}

struct TreeishDrag {
    offered: Vec<String>,
    action: Option<DragAction>,
    finished: bool,
}

impl TreeishDrag {
    fn new() -> Self {
        Self::offering(&["text/plain", "git/treeish-list"])
    }

    fn offering(targets: &[&str]) -> Self {
        Self {
            offered: targets.iter().map(|t| t.to_string()).collect(),
            action: None,
            finished: false,
        }
    }
}

impl DragContext for TreeishDrag {
    fn offered_targets(&self) -> Vec<String> {
        self.offered.clone()
    }

    fn request_data(&mut self, _target: &str) {}

    fn set_action(&mut self, action: DragAction) {
        self.action = Some(action);
    }

    fn finish(&mut self, success: bool) {
        self.finished = success;
    }
}

fn addin_with(resolver: Arc<dyn SummaryResolver>) -> GitNoteAddin {
    let addin = GitNoteAddin::with_resolver(
        GitLinkConfig::default(),
        TagRegistry::new(),
        Arc::new(SilentNotifier::default()),
        resolver,
    );
    addin.initialize();
    addin
}

async fn drop_text(
    addin: &mut GitNoteAddin,
    buffer: &mut MemoryBuffer,
    x: i32,
    y: i32,
    text: &str,
) -> EventDisposition {
    let mut drag = TreeishDrag::new();
    assert_eq!(addin.on_drag_over(&mut drag), EventDisposition::Handled);
    assert_eq!(drag.action, Some(DragAction::Link));
    let outcome = addin.on_drop(&mut drag, &*buffer, x, y, Some(text.as_bytes()));
    assert!(drag.finished);
    if let Some(pending) = outcome.pending {
        let resolved = pending.resolve().await;
        addin.finish_drop(resolved, buffer);
    }
    outcome.disposition
}

#[tokio::test]
async fn test_two_revisions_on_empty_line_use_resolved_summaries() {
    let resolver = TableResolver::default()
        .with("abc123", 0, Resolution::Resolved("abc123 Add parser".to_string()))
        .with("def456", 0, Resolution::Resolved("def456 Fix lexer".to_string()));
    let mut addin = addin_with(Arc::new(resolver));
    let mut buffer = MemoryBuffer::with_text("Notes\n\nEnd");

    // Row 1 is the empty line
    let disposition = drop_text(&mut addin, &mut buffer, 0, 16, "/repo\nabc123\ndef456").await;

    assert_eq!(disposition, EventDisposition::Handled);
    assert_eq!(buffer.text(), "Notes\nabc123 Add parser, def456 Fix lexer\nEnd");

    let tags = buffer.tags();
    assert_eq!(tags.len(), 2);
    assert_eq!(buffer.slice(tags[0].range.clone()), "abc123 Add parser");
    assert_eq!(buffer.slice(tags[1].range.clone()), "def456 Fix lexer");
    assert_eq!(tags[0].link.treeish(), "abc123");
    assert_eq!(tags[1].link.treeish(), "def456");
    assert!(tags
        .iter()
        .all(|t| t.link.repository_path() == Path::new("/repo")));
}

#[tokio::test]
async fn test_unresolved_revisions_show_raw_ids() {
    let mut addin = addin_with(Arc::new(TableResolver::default()));
    let mut buffer = MemoryBuffer::new();

    drop_text(&mut addin, &mut buffer, 0, 0, "/repo\nabc123\ndef456").await;

    assert_eq!(buffer.text(), "abc123, def456");
    let texts: Vec<_> = buffer
        .tags()
        .iter()
        .map(|t| buffer.slice(t.range.clone()))
        .collect();
    assert_eq!(texts, vec!["abc123", "def456"]);
}

#[tokio::test]
async fn test_out_of_order_resolutions_keep_drag_order() {
    let resolver = TableResolver::default()
        .with("slow", 80, Resolution::Resolved("slow First".to_string()))
        .with("mid", 40, Resolution::Resolved("mid Second".to_string()))
        .with("fast", 0, Resolution::Resolved("fast Third".to_string()));
    let mut addin = addin_with(Arc::new(resolver));
    let mut buffer = MemoryBuffer::new();

    drop_text(&mut addin, &mut buffer, 0, 0, "/repo\nslow\nmid\nfast").await;

    assert_eq!(buffer.text(), "slow First, mid Second, fast Third");
    let treeishes: Vec<_> = buffer.tags().iter().map(|t| t.link.treeish()).collect();
    assert_eq!(treeishes, vec!["slow", "mid", "fast"]);
}

#[tokio::test]
async fn test_ranges_are_non_empty_ascending_and_disjoint() {
    let mut addin = addin_with(Arc::new(TableResolver::default()));
    let mut buffer = MemoryBuffer::with_text("prefix ");
    let revisions: Vec<String> = (0..6).map(|i| format!("rev{i}")).collect();
    let payload = format!("/repo\n{}", revisions.join("\n"));

    drop_text(&mut addin, &mut buffer, 7 * 8, 0, &payload).await;

    let tags = buffer.tags();
    assert_eq!(tags.len(), revisions.len());
    for tag in tags {
        assert!(tag.range.start < tag.range.end);
    }
    for pair in tags.windows(2) {
        assert!(pair[0].range.end < pair[1].range.start);
        // Only the separator sits between consecutive links
        assert_eq!(buffer.slice(pair[0].range.end..pair[1].range.start), ", ");
    }
    for (tag, revision) in tags.iter().zip(&revisions) {
        assert_eq!(tag.link.treeish(), revision.as_str());
        assert_eq!(tag.link.repository_path(), Path::new("/repo"));
    }
}

#[tokio::test]
async fn test_duplicate_revisions_get_separate_links() {
    let mut addin = addin_with(Arc::new(TableResolver::default()));
    let mut buffer = MemoryBuffer::new();

    drop_text(&mut addin, &mut buffer, 0, 0, "/repo\nHEAD\nHEAD").await;

    let tags = buffer.tags();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].link, tags[1].link);
    assert_ne!(tags[0].range, tags[1].range);
}

#[tokio::test]
async fn test_malformed_payload_is_claimed_but_inserts_nothing() {
    let resolver = Arc::new(TableResolver::default());
    let mut addin = addin_with(resolver.clone());
    let mut buffer = MemoryBuffer::with_text("untouched");

    let disposition = drop_text(&mut addin, &mut buffer, 0, 0, "only-a-path").await;

    assert_eq!(disposition, EventDisposition::Handled);
    assert_eq!(buffer.text(), "untouched");
    assert!(buffer.tags().is_empty());
    assert!(resolver.calls.lock().is_empty());
}

#[tokio::test]
async fn test_option_like_revision_never_reaches_resolver() {
    let resolver = Arc::new(TableResolver::default());
    let mut addin = addin_with(resolver.clone());
    let mut buffer = MemoryBuffer::new();

    drop_text(&mut addin, &mut buffer, 0, 0, "/repo\n--output=notes\nabc123").await;

    assert_eq!(buffer.text(), "abc123");
    assert_eq!(*resolver.calls.lock(), vec!["abc123".to_string()]);
}

#[tokio::test]
async fn test_drop_lands_where_it_arrived_while_view_scrolls() {
    let summary = Resolution::Resolved("HEAD Tip".to_string());
    let resolver = TableResolver::default().with("HEAD", 30, summary);
    let mut addin = addin_with(Arc::new(resolver));
    let mut buffer = MemoryBuffer::with_text("one\ntwo\nthree");
    let mut drag = TreeishDrag::new();
    addin.on_drag_over(&mut drag);

    let outcome = addin.on_drop(&mut drag, &buffer, 0, 0, Some(b"/repo\nHEAD"));
    assert_eq!(outcome.disposition, EventDisposition::Handled);
    assert!(drag.finished);
    let pending = outcome.pending.expect("treeish drop yields an insertion");

    // Resolution runs on the runtime; the host keeps handling events
    let resolving = tokio::spawn(pending.resolve());
    buffer.scroll_to((0, 32));
    buffer.insert_at_cursor("!");
    let resolved = resolving.await.unwrap();
    let links = addin.finish_drop(resolved, &mut buffer);

    assert_eq!(buffer.text(), "HEAD Tipone\ntwo\nthree!");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].range, 0..8);
}

#[tokio::test]
async fn test_foreign_drag_is_left_to_other_handlers() {
    let mut addin = addin_with(Arc::new(TableResolver::default()));
    let mut buffer = MemoryBuffer::new();
    let mut drag = TreeishDrag::offering(&["text/uri-list"]);

    assert_eq!(addin.on_drag_over(&mut drag), EventDisposition::Propagate);
    let outcome = addin.on_drop(&mut drag, &buffer, 0, 0, Some(b"file:///tmp/x"));

    assert_eq!(outcome.disposition, EventDisposition::Propagate);
    assert!(outcome.pending.is_none());
    assert!(!drag.finished);
    assert_eq!(buffer.text(), "");
}

#[tokio::test]
async fn test_uninitialized_addin_inserts_nothing() {
    let mut addin = GitNoteAddin::with_resolver(
        GitLinkConfig::default(),
        TagRegistry::new(),
        Arc::new(SilentNotifier::default()),
        Arc::new(TableResolver::default()),
    );
    let mut buffer = MemoryBuffer::new();

    let disposition = drop_text(&mut addin, &mut buffer, 0, 0, "/repo\nHEAD").await;

    assert_eq!(disposition, EventDisposition::Handled);
    assert_eq!(buffer.text(), "");
}

#[tokio::test]
async fn test_shutdown_abandons_hanging_resolution() {
    let mut addin = addin_with(Arc::new(HangingResolver));
    let mut buffer = MemoryBuffer::new();
    addin.shutdown();

    let disposition = tokio::time::timeout(
        Duration::from_secs(5),
        drop_text(&mut addin, &mut buffer, 0, 0, "/repo\nHEAD"),
    )
    .await
    .expect("cancelled drop must not hang");

    assert_eq!(disposition, EventDisposition::Handled);
    assert_eq!(buffer.text(), "");
}

#[test]
fn test_initialize_is_idempotent_across_notes() {
    let registry = TagRegistry::new();
    let notifier: Arc<dyn ErrorNotifier> = Arc::new(SilentNotifier::default());
    let first = GitNoteAddin::new(GitLinkConfig::default(), registry.clone(), notifier.clone());
    let second = GitNoteAddin::new(GitLinkConfig::default(), registry.clone(), notifier);

    assert!(first.initialize());
    assert!(!second.initialize());
    assert_eq!(registry.len(), 1);
    assert!(registry.is_registered("link:git"));
}

#[test]
fn test_drop_target_withdrawn_when_note_closes() {
    let addin = addin_with(Arc::new(TableResolver::default()));
    let targets = Arc::new(RecordingTargets::default());

    let registration = addin.on_note_opened(targets.clone());
    assert_eq!(
        *targets.active.lock(),
        vec![("git/treeish-list".to_string(), 51)]
    );
    assert_eq!(registration.names(), ["git/treeish-list".to_string()]);

    drop(registration);
    assert!(targets.active.lock().is_empty());
}
