//! Drop payload decoding.
//!
//! The repository browser sends a treeish list as one UTF-8 text block:
//! the repository path on the first line, then one revision id per line in
//! the order the items were dragged.

use crate::tag::validate_treeish;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Decoded treeish list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropPayload {
    /// Repository the revisions belong to
    pub repository_path: PathBuf,
    /// Revision ids in drag order; never empty
    pub treeishes: Vec<String>,
}

impl DropPayload {
    /// Decode raw selection data.
    ///
    /// Returns `None` when there is nothing to insert: fewer than two lines,
    /// an empty or relative repository path, or no usable revision lines.
    /// Blank revision lines (such as a trailing newline) and ids starting
    /// with `-` are skipped.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let text = String::from_utf8_lossy(data);
        let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

        let path = lines.next()?.trim();
        let revision_lines: Vec<&str> = lines.collect();
        if revision_lines.is_empty() {
            debug!("Treeish list has no revision lines");
            return None;
        }
        if path.is_empty() {
            warn!("Treeish list has an empty repository path");
            return None;
        }

        let repository_path = PathBuf::from(path);
        if !repository_path.is_absolute() {
            warn!(path, "Treeish list repository path is not absolute");
            return None;
        }

        let mut treeishes = Vec::with_capacity(revision_lines.len());
        for (index, line) in revision_lines.iter().enumerate() {
            let treeish = line.trim();
            if treeish.is_empty() {
                debug!(line = index + 1, "Skipping blank revision line");
                continue;
            }
            if let Err(e) = validate_treeish(treeish) {
                warn!(line = index + 1, error = %e, "Skipping invalid revision line");
                continue;
            }
            treeishes.push(treeish.to_string());
        }

        if treeishes.is_empty() {
            debug!("Treeish list contains only blank revision lines");
            return None;
        }

        Some(Self {
            repository_path,
            treeishes,
        })
    }

    /// Encode in the wire format the repository browser produces
    pub fn to_text(&self) -> String {
        let mut text = self.repository_path.to_string_lossy().into_owned();
        for treeish in &self.treeishes {
            text.push('\n');
            text.push_str(treeish);
        }
        text
    }

    /// Number of revision ids
    pub fn len(&self) -> usize {
        self.treeishes.len()
    }

    /// Always false for a parsed payload
    pub fn is_empty(&self) -> bool {
        self.treeishes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_and_revisions_in_order() {
        let payload = DropPayload::parse(b"/repo\nabc123\ndef456").unwrap();
        assert_eq!(payload.repository_path, PathBuf::from("/repo"));
        assert_eq!(payload.treeishes, vec!["abc123", "def456"]);
    }

    #[test]
    fn test_single_line_is_noop() {
        assert_eq!(DropPayload::parse(b"only-a-path"), None);
        assert_eq!(DropPayload::parse(b"/repo"), None);
        assert_eq!(DropPayload::parse(b""), None);
    }

    #[test]
    fn test_path_without_revisions_is_noop() {
        assert_eq!(DropPayload::parse(b"/repo\n"), None);
        assert_eq!(DropPayload::parse(b"/repo\n\n  \n"), None);
    }

    #[test]
    fn test_relative_or_empty_path_is_noop() {
        assert_eq!(DropPayload::parse(b"repo\nHEAD"), None);
        assert_eq!(DropPayload::parse(b"\nHEAD"), None);
    }

    #[test]
    fn test_option_like_revisions_are_skipped() {
        let payload = DropPayload::parse(b"/repo
--output=pwned
abc123
-p").unwrap();
        assert_eq!(payload.treeishes, vec!["abc123"]);

        assert_eq!(DropPayload::parse(b"/repo
--output=pwned"), None);
    }

    #[test]
    fn test_crlf_and_trailing_newline_tolerated() {
        let payload = DropPayload::parse(b"/repo\r\nv1.0\r\nmaster\r\n").unwrap();
        assert_eq!(payload.repository_path, PathBuf::from("/repo"));
        assert_eq!(payload.treeishes, vec!["v1.0", "master"]);
    }

    #[test]
    fn test_to_text_matches_wire_format() {
        let payload = DropPayload {
            repository_path: PathBuf::from("/home/me/src/project"),
            treeishes: vec!["HEAD".to_string(), "HEAD~1".to_string()],
        };
        assert_eq!(payload.to_text(), "/home/me/src/project\nHEAD\nHEAD~1");
    }
}
