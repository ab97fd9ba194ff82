//! Component configurations
//!
//! One section per concern of the add-in. Every section falls back to its
//! defaults when omitted from the file.

mod browser;
mod drag;
mod resolver;
mod tag;

pub use browser::BrowserConfig;
pub use drag::DragConfig;
pub use resolver::ResolverConfig;
pub use tag::TagConfig;
