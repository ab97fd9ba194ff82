//! Note add-in wiring.
//!
//! [`GitNoteAddin`] is the per-note entry point the host calls into: it
//! registers the tag type, advertises the drop target while the note is
//! open, claims treeish drags, inserts links on drop and opens the browser
//! when a link is clicked.

use crate::activation::LinkActivator;
use crate::error::{Error, Result};
use crate::host::{DragContext, DropTargets, ErrorNotifier, EventDisposition, NoteBuffer};
use crate::insertion::{InsertedLink, LinkInsertionEngine, PendingInsertion, ResolvedInsertion};
use crate::negotiator::DragNegotiator;
use crate::registry::TagRegistry;
use crate::resolver::{GitLogResolver, RawIdResolver, SummaryResolver};
use crate::tag::{GitLink, LinkTagType};
use gitlink_config::GitLinkConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Keeps the treeish drop target advertised on an editor.
///
/// Dropping the guard withdraws the target, whichever way the note closes.
#[must_use = "the drop target is withdrawn when the registration is dropped"]
pub struct DropTargetRegistration {
    targets: Arc<dyn DropTargets>,
    names: Vec<String>,
}

impl DropTargetRegistration {
    /// Advertise `names` on `targets` with the given info id
    pub fn new(targets: Arc<dyn DropTargets>, names: Vec<String>, info: u32) -> Self {
        for name in &names {
            targets.add_target(name, info);
        }
        Self { targets, names }
    }

    /// Advertised target names
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Drop for DropTargetRegistration {
    fn drop(&mut self) {
        for name in &self.names {
            self.targets.remove_target(name);
        }
    }
}

impl std::fmt::Debug for DropTargetRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropTargetRegistration")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

/// What the host does after a drop event
#[derive(Debug)]
pub struct DropOutcome {
    /// Whether the drop event was consumed
    pub disposition: EventDisposition,
    /// Links still to be resolved and inserted, if the drop carried any
    pub pending: Option<PendingInsertion>,
}

/// Git link integration for one open note
#[derive(Debug)]
pub struct GitNoteAddin {
    config: GitLinkConfig,
    registry: TagRegistry,
    negotiator: DragNegotiator,
    engine: LinkInsertionEngine,
    activator: LinkActivator,
    cancel: CancellationToken,
}

impl GitNoteAddin {
    /// Create the add-in with the resolver the config selects
    pub fn new(
        config: GitLinkConfig,
        registry: TagRegistry,
        notifier: Arc<dyn ErrorNotifier>,
    ) -> Self {
        let resolver: Arc<dyn SummaryResolver> = if config.resolver.enabled {
            Arc::new(GitLogResolver::from_config(&config.resolver))
        } else {
            Arc::new(RawIdResolver)
        };
        Self::with_resolver(config, registry, notifier, resolver)
    }

    /// Create the add-in with an explicit summary resolver
    pub fn with_resolver(
        config: GitLinkConfig,
        registry: TagRegistry,
        notifier: Arc<dyn ErrorNotifier>,
        resolver: Arc<dyn SummaryResolver>,
    ) -> Self {
        let engine = LinkInsertionEngine::new(registry.clone(), config.tag.name.clone(), resolver);
        Self {
            negotiator: DragNegotiator::from_config(&config.drag),
            activator: LinkActivator::from_config(&config.browser, notifier),
            engine,
            registry,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Register the link tag type; safe to call for every note.
    ///
    /// Returns `true` if this call performed the registration.
    pub fn initialize(&self) -> bool {
        self.registry.register(LinkTagType::from_config(&self.config.tag))
    }

    /// Advertise the treeish drop target on the note's editor
    pub fn on_note_opened(&self, targets: Arc<dyn DropTargets>) -> DropTargetRegistration {
        let names = self.negotiator.accepted_targets().to_vec();
        debug!(?names, "Advertising treeish drop targets");
        DropTargetRegistration::new(targets, names, self.config.drag.info)
    }

    /// Drag moved over the editor
    pub fn on_drag_over(&mut self, ctx: &mut dyn DragContext) -> EventDisposition {
        self.negotiator.on_drag_over(ctx)
    }

    /// Drag left the editor
    pub fn on_drag_leave(&mut self) {
        self.negotiator.on_drag_leave();
    }

    /// Drop data arrived at widget-relative `(x, y)`.
    ///
    /// Completes the drag and fixes the insertion offset against the view as
    /// it is now. The returned [`PendingInsertion`] owns its data: the host
    /// awaits [`PendingInsertion::resolve`] (or spawns it) while it keeps
    /// dispatching, then passes the result to [`GitNoteAddin::finish_drop`].
    pub fn on_drop<B>(
        &mut self,
        ctx: &mut dyn DragContext,
        buffer: &B,
        x: i32,
        y: i32,
        data: Option<&[u8]>,
    ) -> DropOutcome
    where
        B: NoteBuffer + ?Sized,
    {
        let decision = self.negotiator.on_drop(ctx, data);
        let pending = decision.payload.map(|payload| {
            self.engine
                .begin(buffer, x, y, payload, self.cancel.child_token())
        });
        DropOutcome {
            disposition: decision.disposition,
            pending,
        }
    }

    /// Insert a resolved drop into the note.
    ///
    /// Insertion problems are logged, never returned: the drop event was
    /// already consumed. Returns the inserted links, empty on failure.
    pub fn finish_drop<B>(
        &self,
        resolved: Result<ResolvedInsertion>,
        buffer: &mut B,
    ) -> Vec<InsertedLink>
    where
        B: NoteBuffer + ?Sized,
    {
        match resolved.and_then(|resolved| resolved.apply(buffer)) {
            Ok(links) => {
                debug!(count = links.len(), "Drop inserted git links");
                links
            }
            Err(Error::Cancelled) => {
                debug!("Drop abandoned, note closing");
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "Failed to insert git links");
                Vec::new()
            }
        }
    }

    /// A git link was clicked
    pub fn on_link_activated(&self, link: &GitLink) -> EventDisposition {
        self.activator.activate(link)
    }

    /// Cancel in-flight resolutions; pending drops insert nothing
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Effective configuration
    pub fn config(&self) -> &GitLinkConfig {
        &self.config
    }

    /// Shared tag registry
    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }
}
