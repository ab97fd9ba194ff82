//! Repository browser configuration

use serde::{Deserialize, Serialize};

/// External repository browser opened when a link is activated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Browser executable
    #[serde(default = "default_program")]
    pub program: String,

    /// Flag that precedes the revision to select
    #[serde(default = "default_select_flag")]
    pub select_flag: String,
}

fn default_program() -> String {
    "gitg".to_string()
}

fn default_select_flag() -> String {
    "--select".to_string()
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            select_flag: default_select_flag(),
        }
    }
}
