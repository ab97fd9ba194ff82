//! Traits the host editor implements.
//!
//! The add-in never touches a widget toolkit directly. The note editor
//! exposes its text buffer, the in-flight drag, its drop-target list and a
//! way to show errors through these seams. All of them are driven from the
//! host's dispatch thread.

use crate::tag::GitLink;
use std::ops::Range;

/// Whether an event was consumed or should reach other handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Consumed; stop further emission
    Handled,
    /// Not ours; let other handlers see it
    Propagate,
}

impl EventDisposition {
    /// True for [`EventDisposition::Handled`]
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Action reported back to the drag source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    /// Data is copied
    Copy,
    /// Data is moved
    Move,
    /// A reference to the data is created
    Link,
}

/// Text buffer of an open note.
///
/// Offsets are character offsets into the buffer.
pub trait NoteBuffer {
    /// Top-left corner of the visible region in document coordinates
    fn visible_origin(&self) -> (i32, i32);

    /// Nearest buffer offset to a point in document coordinates
    fn offset_at_location(&self, x: i32, y: i32) -> usize;

    /// Move the insertion cursor; offsets past the end clamp to the end
    fn place_cursor(&mut self, offset: usize);

    /// Current insertion cursor offset
    fn cursor(&self) -> usize;

    /// Whether `offset` is the first position of a line
    fn is_line_start(&self, offset: usize) -> bool;

    /// Insert untagged text at the cursor; the cursor ends up after it
    fn insert_at_cursor(&mut self, text: &str);

    /// Decorate `range` with `link`
    fn apply_tag(&mut self, link: GitLink, range: Range<usize>);
}

/// The drag session as seen by the drop target
pub trait DragContext {
    /// Target names offered by the drag source
    fn offered_targets(&self) -> Vec<String>;

    /// Ask the source to deliver its data converted to `target`
    fn request_data(&mut self, target: &str);

    /// Tell the source which action a drop would perform
    fn set_action(&mut self, action: DragAction);

    /// Complete the drag
    fn finish(&mut self, success: bool);
}

/// Drop-target list of the editor widget
pub trait DropTargets: Send + Sync {
    /// Advertise `target` with the given info id
    fn add_target(&self, target: &str, info: u32);

    /// Withdraw `target`
    fn remove_target(&self, target: &str);
}

/// User-visible, non-fatal error reporting (a message dialog in a GUI host)
pub trait ErrorNotifier: Send + Sync {
    /// Show an error with a short title and a detail message
    fn notify_error(&self, title: &str, message: &str);
}
