//! Loading the add-in configuration from disk and the environment.

use crate::components::{BrowserConfig, DragConfig, ResolverConfig, TagConfig};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "GITLINK_CONFIG";
/// Environment override for the git executable
pub const GIT_PROGRAM_ENV: &str = "GITLINK_GIT";
/// Environment override for the repository browser executable
pub const BROWSER_PROGRAM_ENV: &str = "GITLINK_BROWSER";
/// Environment override for the resolution timeout in milliseconds
pub const RESOLVE_TIMEOUT_ENV: &str = "GITLINK_RESOLVE_TIMEOUT_MS";

/// Complete add-in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLinkConfig {
    /// Link tag name and style
    #[serde(default)]
    pub tag: TagConfig,

    /// Drop target negotiation
    #[serde(default)]
    pub drag: DragConfig,

    /// Summary resolution via `git log`
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Repository browser launched on click
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl GitLinkConfig {
    /// Load configuration, applying environment overrides and validation.
    ///
    /// Lookup order: `config_file`, then `$GITLINK_CONFIG`, then
    /// `<config_dir>/gitlink/config.toml`. A missing file means defaults.
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let path = config_file
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(|| Self::default_config_path().ok())
            .filter(|p| p.exists());

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without env overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Default config file location: `<config_dir>/gitlink/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("gitlink").join("config.toml"))
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    ///
    /// Unparseable numeric values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(program) = lookup(GIT_PROGRAM_ENV) {
            self.resolver.program = program;
        }
        if let Some(program) = lookup(BROWSER_PROGRAM_ENV) {
            self.browser.program = program;
        }
        if let Some(timeout) = lookup(RESOLVE_TIMEOUT_ENV).and_then(|v| v.trim().parse().ok()) {
            self.resolver.timeout_ms = timeout;
        }
    }

    /// Reject values the add-in cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.tag.name.trim().is_empty() {
            return Err(ConfigError::invalid("tag.name", "must not be empty"));
        }
        if self.drag.accepted_targets().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::invalid("drag.target", "must not be empty"));
        }
        if self.resolver.program.trim().is_empty() {
            return Err(ConfigError::invalid("resolver.program", "must not be empty"));
        }
        if self.resolver.timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "resolver.timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.browser.program.trim().is_empty() {
            return Err(ConfigError::invalid("browser.program", "must not be empty"));
        }
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = GitLinkConfig::from_toml_str("").unwrap();
        assert_eq!(config, GitLinkConfig::default());
        assert_eq!(config.drag.target, "git/treeish-list");
        assert_eq!(config.browser.program, "gitg");
    }

    #[test]
    fn test_overrides_replace_programs_and_timeout() {
        let vars: HashMap<&str, &str> = [
            (GIT_PROGRAM_ENV, "/usr/local/bin/git"),
            (BROWSER_PROGRAM_ENV, "gitk"),
            (RESOLVE_TIMEOUT_ENV, "750"),
        ]
        .into_iter()
        .collect();

        let mut config = GitLinkConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.resolver.program, "/usr/local/bin/git");
        assert_eq!(config.browser.program, "gitk");
        assert_eq!(config.resolver.timeout_ms, 750);
    }

    #[test]
    fn test_bad_timeout_override_is_ignored() {
        let mut config = GitLinkConfig::default();
        config.apply_overrides(|k| (k == RESOLVE_TIMEOUT_ENV).then(|| "soon".to_string()));
        assert_eq!(config.resolver.timeout_ms, 2000);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = GitLinkConfig::default();
        config.resolver.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("resolver.timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_blank_alternate_target() {
        let mut config = GitLinkConfig::default();
        config.drag.accept_alternate_targets.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_output_parses_back() {
        let mut config = GitLinkConfig::default();
        config.browser.program = "gitk".to_string();
        let rendered = config.to_toml().unwrap();
        assert_eq!(GitLinkConfig::from_toml_str(&rendered).unwrap(), config);
    }
}
