//! Opening the repository browser for a clicked link.

use crate::error::{Error, Result};
use crate::host::{ErrorNotifier, EventDisposition};
use crate::tag::GitLink;
use gitlink_config::BrowserConfig;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Title of the dialog shown when the browser cannot be started
pub const LAUNCH_ERROR_TITLE: &str = "Cannot open Git repository browser";

/// Launches the repository browser focused on a link's revision
#[derive(Clone)]
pub struct LinkActivator {
    program: String,
    select_flag: String,
    notifier: Arc<dyn ErrorNotifier>,
}

impl LinkActivator {
    /// Create an activator for `program`, selecting revisions with `select_flag`
    pub fn new(
        program: impl Into<String>,
        select_flag: impl Into<String>,
        notifier: Arc<dyn ErrorNotifier>,
    ) -> Self {
        Self {
            program: program.into(),
            select_flag: select_flag.into(),
            notifier,
        }
    }

    /// Create an activator from the `[browser]` config section
    pub fn from_config(config: &BrowserConfig, notifier: Arc<dyn ErrorNotifier>) -> Self {
        Self::new(config.program.clone(), config.select_flag.clone(), notifier)
    }

    /// Handle a click on `link`.
    ///
    /// A failed launch is reported through the notifier; the click is
    /// consumed either way.
    pub fn activate(&self, link: &GitLink) -> EventDisposition {
        if let Err(e) = self.launch(link) {
            let message = e.to_string();
            error!("{}", message);
            self.notifier.notify_error(LAUNCH_ERROR_TITLE, &message);
        }
        EventDisposition::Handled
    }

    /// Start the browser without waiting for it.
    pub fn launch(&self, link: &GitLink) -> Result<()> {
        info!(
            repo = %link.repository_path().display(),
            treeish = link.treeish(),
            "Opening repository browser"
        );

        let mut child = Command::new(&self.program)
            .arg(&self.select_flag)
            .arg(link.treeish())
            .current_dir(link.repository_path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| Error::Launch {
                program: self.program.clone(),
                source,
            })?;

        // Reap the browser when it exits so it does not linger as a zombie
        let reaper = std::thread::Builder::new()
            .name("gitlink-browser-reaper".to_string())
            .spawn(move || {
                let _ = child.wait();
            });
        if let Err(e) = reaper {
            warn!(error = %e, "Could not start browser reaper thread");
        }

        Ok(())
    }
}

impl std::fmt::Debug for LinkActivator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkActivator")
            .field("program", &self.program)
            .field("select_flag", &self.select_flag)
            .finish_non_exhaustive()
    }
}
