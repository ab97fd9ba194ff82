//! # GitLink Configuration Library
//!
//! Typed configuration for the git link add-in: the tag style, the drag
//! target it negotiates, the external commands it runs and their limits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gitlink_config::GitLinkConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GitLinkConfig::load(None)?;
//!     println!("resolving summaries with {}", config.resolver.program);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
mod error;
mod loader;

pub use components::*;
pub use error::*;
pub use loader::*;
