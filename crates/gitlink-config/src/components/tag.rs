//! Link tag style configuration

use serde::{Deserialize, Serialize};

/// Name and visual style of the git link tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConfig {
    /// Name the tag type is registered under; persisted with every note
    #[serde(default = "default_tag_name")]
    pub name: String,

    /// Foreground color of link text
    #[serde(default = "default_foreground")]
    pub foreground: String,

    /// Whether link text is underlined
    #[serde(default = "default_underline")]
    pub underline: bool,

    /// Icon resource shown next to the link
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_tag_name() -> String {
    "link:git".to_string()
}

fn default_foreground() -> String {
    "blue".to_string()
}

fn default_underline() -> bool {
    true
}

fn default_icon() -> String {
    "git".to_string()
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            name: default_tag_name(),
            foreground: default_foreground(),
            underline: default_underline(),
            icon: default_icon(),
        }
    }
}
