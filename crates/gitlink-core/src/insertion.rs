//! Link insertion.
//!
//! A drop is handled in three steps. When the drop arrives, its location is
//! mapped to a buffer offset against the view as it is at that moment
//! ([`LinkInsertionEngine::begin`]). Summaries for all revision ids are then
//! resolved concurrently on the runtime, each bounded by the resolver's
//! timeout and by the drop's cancellation token; nothing borrows the buffer
//! meanwhile ([`PendingInsertion::resolve`]). Finally the links are inserted
//! synchronously, in drag order, on the dispatch thread
//! ([`ResolvedInsertion::apply`]):
//!
//! - the first link lands at the captured drop offset
//! - every further link follows the previous one, separated by a newline
//!   when the cursor sits at a line start and by `", "` otherwise
//! - each link's tag covers exactly its own text

use crate::error::{Error, Result};
use crate::host::NoteBuffer;
use crate::payload::DropPayload;
use crate::registry::TagRegistry;
use crate::resolver::{Resolution, SummaryResolver};
use crate::tag::{GitLink, LinkTarget};
use std::ops::Range;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// A link inserted into a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedLink {
    /// The tag instance applied to the text
    pub link: GitLink,
    /// Character range the tag covers
    pub range: Range<usize>,
    /// Whether the text is a resolved summary rather than the raw id
    pub resolved: bool,
}

/// A drop with a fixed insertion offset, waiting for its summaries.
///
/// Owns everything it needs, so [`PendingInsertion::resolve`] can be spawned
/// on the runtime while the host keeps dispatching events.
#[derive(Debug)]
pub struct PendingInsertion {
    engine: LinkInsertionEngine,
    payload: DropPayload,
    offset: usize,
    cancel: CancellationToken,
}

impl PendingInsertion {
    /// Buffer offset the first link will be inserted at
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The dropped treeish list
    pub fn payload(&self) -> &DropPayload {
        &self.payload
    }

    /// Resolve summaries for every revision.
    ///
    /// Fails with [`Error::Cancelled`] if the drop's token fires first.
    #[instrument(
        skip_all,
        fields(repo = %self.payload.repository_path.display(), revisions = self.payload.len())
    )]
    pub async fn resolve(self) -> Result<ResolvedInsertion> {
        let resolutions = self.engine.resolve_all(&self.payload, &self.cancel).await?;
        Ok(ResolvedInsertion {
            engine: self.engine,
            payload: self.payload,
            offset: self.offset,
            cancel: self.cancel,
            resolutions,
        })
    }
}

/// A drop whose summaries are known; ready to be applied to the buffer
#[derive(Debug)]
pub struct ResolvedInsertion {
    engine: LinkInsertionEngine,
    payload: DropPayload,
    offset: usize,
    cancel: CancellationToken,
    resolutions: Vec<Resolution>,
}

impl ResolvedInsertion {
    /// Resolutions in drag order
    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// Insert the links at the offset captured when the drop arrived.
    ///
    /// A drop cancelled after resolution still inserts nothing.
    pub fn apply<B>(self, buffer: &mut B) -> Result<Vec<InsertedLink>>
    where
        B: NoteBuffer + ?Sized,
    {
        if self.cancel.is_cancelled() {
            debug!("Drop cancelled before insertion");
            return Err(Error::Cancelled);
        }
        self.engine
            .apply_at(buffer, self.offset, &self.payload, self.resolutions)
    }
}

/// Inserts tagged git links into a note buffer
#[derive(Clone)]
pub struct LinkInsertionEngine {
    registry: TagRegistry,
    tag_name: String,
    resolver: Arc<dyn SummaryResolver>,
}

impl LinkInsertionEngine {
    /// Create an engine creating tags named `tag_name` from `registry`
    pub fn new(
        registry: TagRegistry,
        tag_name: impl Into<String>,
        resolver: Arc<dyn SummaryResolver>,
    ) -> Self {
        Self {
            registry,
            tag_name: tag_name.into(),
            resolver,
        }
    }

    /// Fix the drop location and hand back the work still to do.
    ///
    /// `(x, y)` is relative to the visible region of the editor and is
    /// converted with the visible origin as it is now.
    pub fn begin<B>(
        &self,
        buffer: &B,
        x: i32,
        y: i32,
        payload: DropPayload,
        cancel: CancellationToken,
    ) -> PendingInsertion
    where
        B: NoteBuffer + ?Sized,
    {
        let offset = drop_offset(buffer, x, y);
        debug!(x, y, offset, "Drop location mapped");
        PendingInsertion {
            engine: self.clone(),
            payload,
            offset,
            cancel,
        }
    }

    /// Resolve and insert every revision of `payload` at the drop location.
    ///
    /// Returns the inserted links in drag order, or [`Error::Cancelled`]
    /// (with the buffer untouched) if `cancel` fired before insertion.
    pub async fn insert_all<B>(
        &self,
        buffer: &mut B,
        x: i32,
        y: i32,
        payload: &DropPayload,
        cancel: &CancellationToken,
    ) -> Result<Vec<InsertedLink>>
    where
        B: NoteBuffer + ?Sized,
    {
        let pending = self.begin(&*buffer, x, y, payload.clone(), cancel.clone());
        pending.resolve().await?.apply(buffer)
    }

    /// Resolve summaries for all revisions concurrently, in drag order.
    pub async fn resolve_all(
        &self,
        payload: &DropPayload,
        cancel: &CancellationToken,
    ) -> Result<Vec<Resolution>> {
        let mut tasks = JoinSet::new();
        for (index, treeish) in payload.treeishes.iter().enumerate() {
            let resolver = Arc::clone(&self.resolver);
            let repository_path = payload.repository_path.clone();
            let treeish = treeish.clone();
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let resolution = tokio::select! {
                    biased;
                    () = cancel.cancelled() => Resolution::Unresolved,
                    resolution = resolver.resolve(&repository_path, &treeish) => resolution,
                };
                (index, resolution)
            });
        }

        // Tasks finish in any order; slot results back by drag index
        let mut slots: Vec<Option<Resolution>> = vec![None; payload.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, resolution)) => slots[index] = Some(resolution),
                Err(e) => warn!(error = %e, "Summary resolution task failed"),
            }
        }

        if cancel.is_cancelled() {
            debug!("Drop cancelled during resolution");
            return Err(Error::Cancelled);
        }

        Ok(slots
            .into_iter()
            .map(|slot| slot.unwrap_or(Resolution::Unresolved))
            .collect())
    }

    /// Insert resolved links at the widget-relative drop location `(x, y)`.
    pub fn apply<B>(
        &self,
        buffer: &mut B,
        x: i32,
        y: i32,
        payload: &DropPayload,
        resolutions: Vec<Resolution>,
    ) -> Result<Vec<InsertedLink>>
    where
        B: NoteBuffer + ?Sized,
    {
        let offset = drop_offset(&*buffer, x, y);
        self.apply_at(buffer, offset, payload, resolutions)
    }

    /// Insert resolved links starting at buffer `offset`.
    ///
    /// All tags are created before the buffer is touched, so a failure
    /// leaves the note unchanged.
    pub fn apply_at<B>(
        &self,
        buffer: &mut B,
        offset: usize,
        payload: &DropPayload,
        resolutions: Vec<Resolution>,
    ) -> Result<Vec<InsertedLink>>
    where
        B: NoteBuffer + ?Sized,
    {
        let mut pending = Vec::with_capacity(payload.len());
        let mut resolutions = resolutions.into_iter();
        for treeish in &payload.treeishes {
            let resolution = resolutions.next().unwrap_or(Resolution::Unresolved);
            let target = LinkTarget::new(payload.repository_path.clone(), treeish.as_str())?;
            let link = self.registry.create(&self.tag_name, target)?;
            let resolved = resolution.is_resolved();
            pending.push((link, resolution.display_text(treeish), resolved));
        }

        buffer.place_cursor(offset);

        let mut inserted = Vec::with_capacity(pending.len());
        for (index, (link, text, resolved)) in pending.into_iter().enumerate() {
            if index > 0 {
                let separator = if buffer.is_line_start(buffer.cursor()) {
                    "\n"
                } else {
                    ", "
                };
                buffer.insert_at_cursor(separator);
            }

            let start = buffer.cursor();
            buffer.insert_at_cursor(&text);
            let end = buffer.cursor();
            debug_assert!(start < end, "link text must not be empty");

            debug!(treeish = link.treeish(), start, end, "Inserted git link");
            buffer.apply_tag(link.clone(), start..end);
            inserted.push(InsertedLink {
                link,
                range: start..end,
                resolved,
            });
        }

        Ok(inserted)
    }
}

/// Buffer offset under the widget-relative point `(x, y)`
fn drop_offset<B>(buffer: &B, x: i32, y: i32) -> usize
where
    B: NoteBuffer + ?Sized,
{
    let (origin_x, origin_y) = buffer.visible_origin();
    buffer.offset_at_location(x + origin_x, y + origin_y)
}

impl std::fmt::Debug for LinkInsertionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkInsertionEngine")
            .field("tag_name", &self.tag_name)
            .finish_non_exhaustive()
    }
}
