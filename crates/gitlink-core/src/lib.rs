//! # GitLink Core
//!
//! Turns revisions dragged out of a repository browser into clickable links
//! inside a note, and opens the browser again when such a link is clicked.
//!
//! ## Architecture Overview
//!
//! ```text
//! drag-over ──▶ DragNegotiator ──(armed)──▶ drop ──▶ DropPayload::parse
//!                                                        │
//!                       SummaryResolver ◀── one task per revision id
//!                              │  (timeout, cancellable, re-ordered)
//!                              ▼
//!                     LinkInsertionEngine ──▶ NoteBuffer (+ GitLink tags)
//!                     (offset fixed at drop, applied after resolution)
//!
//! click ──▶ LinkActivator ──▶ repository browser (fire and forget)
//! ```
//!
//! The editor widget, its tag table and dialogs are provided by the host
//! through the traits in [`host`]. [`GitNoteAddin`] wires everything together
//! for a single note.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod activation;
pub mod addin;
pub mod buffer;
pub mod error;
pub mod host;
pub mod insertion;
pub mod negotiator;
pub mod payload;
pub mod registry;
pub mod resolver;
pub mod tag;

pub use activation::LinkActivator;
pub use addin::{DropOutcome, DropTargetRegistration, GitNoteAddin};
pub use buffer::{AppliedTag, MemoryBuffer};
pub use error::{Error, Result};
pub use host::{DragAction, DragContext, DropTargets, ErrorNotifier, EventDisposition, NoteBuffer};
pub use insertion::{InsertedLink, LinkInsertionEngine, PendingInsertion, ResolvedInsertion};
pub use negotiator::{DragNegotiator, DropDecision, NegotiationState};
pub use payload::DropPayload;
pub use registry::TagRegistry;
pub use resolver::{GitLogResolver, RawIdResolver, Resolution, SummaryResolver};
pub use tag::{GitLink, LinkTagType, LinkTarget, TagStyle, GIT_LINK_TAG_NAME};

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::{
        DragContext, DropPayload, Error, EventDisposition, GitLink, GitNoteAddin, LinkTarget,
        NoteBuffer, Resolution, Result, SummaryResolver, TagRegistry,
    };
}
