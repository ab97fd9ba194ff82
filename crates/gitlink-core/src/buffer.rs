//! In-memory note buffer
//!
//! A [`NoteBuffer`] over a plain string laid out on a fixed character grid.
//! Used for headless drops (the CLI) and in tests. Applied tag ranges move
//! with insertions the way a text widget's tag toggles do.

use crate::host::NoteBuffer;
use crate::tag::GitLink;
use std::ops::Range;

/// A tag applied to a range of a [`MemoryBuffer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTag {
    /// The link instance
    pub link: GitLink,
    /// Decorated character range
    pub range: Range<usize>,
}

/// Plain-text note buffer with a fixed-size character cell
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    text: String,
    cursor: usize,
    visible_origin: (i32, i32),
    cell_width: i32,
    line_height: i32,
    tags: Vec<AppliedTag>,
}

impl MemoryBuffer {
    /// Create an empty buffer with an 8x16 cell
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a buffer holding `text`, cursor at the end
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            visible_origin: (0, 0),
            cell_width: 8,
            line_height: 16,
            tags: Vec::new(),
        }
    }

    /// Set the character cell size used to map locations to offsets
    pub fn with_cell_size(mut self, width: i32, height: i32) -> Self {
        self.cell_width = width.max(1);
        self.line_height = height.max(1);
        self
    }

    /// Scroll so the visible region starts at `origin`
    pub fn scroll_to(&mut self, origin: (i32, i32)) {
        self.visible_origin = origin;
    }

    /// Full buffer text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Tags in the order they were applied
    pub fn tags(&self) -> &[AppliedTag] {
        &self.tags
    }

    /// Text covered by a character range
    pub fn slice(&self, range: Range<usize>) -> String {
        self.text
            .chars()
            .skip(range.start)
            .take(range.end.saturating_sub(range.start))
            .collect()
    }

    fn byte_index(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Character offset of the start of each line
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        starts.extend(
            self.text
                .chars()
                .enumerate()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );
        starts
    }
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteBuffer for MemoryBuffer {
    fn visible_origin(&self) -> (i32, i32) {
        self.visible_origin
    }

    fn offset_at_location(&self, x: i32, y: i32) -> usize {
        let starts = self.line_starts();
        let line = usize::try_from(y.max(0) / self.line_height).unwrap_or(0);
        let Some(&start) = starts.get(line) else {
            return self.char_len();
        };
        // Exclusive of the newline terminating the line
        let end = starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or_else(|| self.char_len());
        let column = usize::try_from(x.max(0) / self.cell_width).unwrap_or(0);
        (start + column).min(end)
    }

    fn place_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.char_len());
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn is_line_start(&self, offset: usize) -> bool {
        offset == 0 || self.text.chars().nth(offset - 1) == Some('\n')
    }

    fn insert_at_cursor(&mut self, text: &str) {
        let at = self.cursor;
        let inserted = text.chars().count();
        let index = self.byte_index(at);
        self.text.insert_str(index, text);

        for tag in &mut self.tags {
            if tag.range.start >= at {
                tag.range.start += inserted;
            }
            if tag.range.end > at {
                tag.range.end += inserted;
            }
        }
        self.cursor = at + inserted;
    }

    fn apply_tag(&mut self, link: GitLink, range: Range<usize>) {
        self.tags.push(AppliedTag { link, range });
    }
}
