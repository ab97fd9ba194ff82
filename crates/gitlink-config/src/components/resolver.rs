//! Revision summary resolution configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How link text is resolved from a revision id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Resolve a one-line summary; when false the raw revision id is shown
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Git executable used for `log --oneline`
    #[serde(default = "default_program")]
    pub program: String,

    /// Upper bound for one resolution, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_program() -> String {
    "git".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

impl ResolverConfig {
    /// Resolution timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            program: default_program(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
