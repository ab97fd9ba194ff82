//! Link tag types and instances.
//!
//! A [`LinkTagType`] carries the style shared by every git link in the
//! process. A [`GitLink`] is one decorated span's identity: the repository
//! and revision it points at. Both are immutable once built.

use crate::error::{Error, Result};
use gitlink_config::TagConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default name the git link tag type is registered under
pub const GIT_LINK_TAG_NAME: &str = "link:git";

/// Persisted attribute holding the repository path
pub const REPO_PATH_ATTRIBUTE: &str = "repo-path";

/// Persisted attribute holding the revision id
pub const TREEISH_ATTRIBUTE: &str = "treeish";

/// Visual style applied to every link of a tag type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStyle {
    /// Single underline under the link text
    pub underline: bool,
    /// Foreground color name
    pub foreground: String,
    /// Icon resource drawn with the link
    pub icon: String,
    /// Whether clicking the span activates it
    pub can_activate: bool,
}

impl TagStyle {
    /// Build the style from the `[tag]` config section
    pub fn from_config(config: &TagConfig) -> Self {
        Self {
            underline: config.underline,
            foreground: config.foreground.clone(),
            icon: config.icon.clone(),
            can_activate: true,
        }
    }
}

impl Default for TagStyle {
    fn default() -> Self {
        Self::from_config(&TagConfig::default())
    }
}

/// A named, styled tag type; registered once per process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTagType {
    name: String,
    style: TagStyle,
}

impl LinkTagType {
    /// Create a tag type with an explicit style
    pub fn new(name: impl Into<String>, style: TagStyle) -> Self {
        Self {
            name: name.into(),
            style,
        }
    }

    /// The git link type with default style
    pub fn git_link() -> Self {
        Self::new(GIT_LINK_TAG_NAME, TagStyle::default())
    }

    /// Build the tag type from the `[tag]` config section
    pub fn from_config(config: &TagConfig) -> Self {
        Self::new(config.name.clone(), TagStyle::from_config(config))
    }

    /// Registration name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared style
    pub fn style(&self) -> &TagStyle {
        &self.style
    }
}

/// Repository and revision a link points at
///
/// Validated on construction: the repository path is absolute and the
/// revision id is a single non-empty line that cannot be read as an option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkTarget {
    repository_path: PathBuf,
    treeish: String,
}

impl LinkTarget {
    /// Validate and build a link target
    pub fn new(repository_path: impl Into<PathBuf>, treeish: impl Into<String>) -> Result<Self> {
        let repository_path = repository_path.into();
        let treeish = treeish.into();

        if repository_path.as_os_str().is_empty() {
            return Err(Error::InvalidLink("repository path is empty".to_string()));
        }
        if !repository_path.is_absolute() {
            return Err(Error::InvalidLink(format!(
                "repository path '{}' is not absolute",
                repository_path.display()
            )));
        }
        validate_treeish(&treeish)?;

        Ok(Self {
            repository_path,
            treeish,
        })
    }

    /// Repository working directory
    pub fn repository_path(&self) -> &Path {
        &self.repository_path
    }

    /// Revision id (hash, tag or ref)
    pub fn treeish(&self) -> &str {
        &self.treeish
    }
}

/// Check that `treeish` is usable as a revision id.
///
/// It is handed to `git` and the repository browser as a positional
/// argument, so a leading `-` is refused.
pub fn validate_treeish(treeish: &str) -> Result<()> {
    let trimmed = treeish.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidLink("revision id is empty".to_string()));
    }
    if treeish.contains(['\n', '\r']) {
        return Err(Error::InvalidLink(format!(
            "revision id '{}' spans multiple lines",
            treeish.escape_debug()
        )));
    }
    if trimmed.starts_with('-') {
        return Err(Error::InvalidLink(format!(
            "revision id '{trimmed}' looks like an option"
        )));
    }
    Ok(())
}

/// One git link tag instance
///
/// Owned by the note's tag collection once applied. The target never changes
/// after creation; a duplicate drop yields a distinct, equal-valued instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitLink {
    tag_type: Arc<LinkTagType>,
    target: LinkTarget,
}

impl GitLink {
    pub(crate) fn new(tag_type: Arc<LinkTagType>, target: LinkTarget) -> Self {
        Self { tag_type, target }
    }

    /// Rebuild a link from attributes persisted with a note.
    pub fn from_attributes(
        tag_type: Arc<LinkTagType>,
        attributes: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let get = |key: &str| {
            attributes
                .get(key)
                .ok_or_else(|| Error::InvalidAttributes(format!("missing '{}'", key)))
        };
        let repository_path = get(REPO_PATH_ATTRIBUTE)?;
        let treeish = get(TREEISH_ATTRIBUTE)?;

        let target = LinkTarget::new(repository_path.as_str(), treeish.as_str())
            .map_err(|e| Error::InvalidAttributes(e.to_string()))?;
        Ok(Self::new(tag_type, target))
    }

    /// Attributes the host persists alongside the tagged range
    pub fn attributes(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                REPO_PATH_ATTRIBUTE.to_string(),
                self.target.repository_path.to_string_lossy().into_owned(),
            ),
            (TREEISH_ATTRIBUTE.to_string(), self.target.treeish.clone()),
        ])
    }

    /// The tag type this instance belongs to
    pub fn tag_type(&self) -> &LinkTagType {
        &self.tag_type
    }

    /// Repository and revision
    pub fn target(&self) -> &LinkTarget {
        &self.target
    }

    /// Repository working directory
    pub fn repository_path(&self) -> &Path {
        self.target.repository_path()
    }

    /// Revision id
    pub fn treeish(&self) -> &str {
        self.target.treeish()
    }
}
