//! Recording-session lifecycle: one start-to-stop capture per user.
//!
//! The session is tracked by two on-disk artifacts, a pidfile and a log
//! file whose first line is the output path. Their existence is the
//! "recording may be active" signal a later invocation toggles against.
//! All reads and writes of those files go through [`handle`]; nothing else
//! touches them.

mod controller;
mod dependencies;
mod handle;
mod paths;
#[cfg(test)]
mod tests;

pub use controller::{SessionController, SessionError, StartRequest, ToggleOutcome};
pub use dependencies::SessionDependencies;
pub use handle::SessionHandle;
pub use paths::SessionPaths;
