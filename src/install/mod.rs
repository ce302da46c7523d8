//! Tool acquisition.
//!
//! - [`context::RunContext`]: per-run state shared by every method
//! - [`executor::Executor`]: the attempt contract, implemented by `RunContext`
//! - [`orchestrator`]: walks each tool's method chain until the binary exists
//!
//! One module per install strategy family sits behind the executor.

mod archive;
pub mod context;
pub mod executor;
mod github;
mod interpreted;
mod language;
pub mod native;
pub mod orchestrator;
mod source;
mod universal;

pub use context::RunContext;
pub use orchestrator::{OutcomeKind, Selector, Summary, install_tools};
