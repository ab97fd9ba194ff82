//! Drag-and-drop target configuration

use serde::{Deserialize, Serialize};

/// Drop target the editor advertises for treeish lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Target (MIME-like) name offered by the repository browser
    #[serde(default = "default_target")]
    pub target: String,

    /// Info id the target is registered with on the editor widget
    #[serde(default = "default_info")]
    pub info: u32,

    /// Additional target names accepted as the same payload format
    ///
    /// Some browser builds offer a vendor-prefixed variant of the target.
    #[serde(default)]
    pub accept_alternate_targets: Vec<String>,
}

fn default_target() -> String {
    "git/treeish-list".to_string()
}

fn default_info() -> u32 {
    51
}

impl DragConfig {
    /// All target names this add-in claims, primary first
    pub fn accepted_targets(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.target.as_str())
            .chain(self.accept_alternate_targets.iter().map(String::as_str))
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            info: default_info(),
            accept_alternate_targets: Vec::new(),
        }
    }
}
