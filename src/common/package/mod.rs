//! Native package management across distribution families.
//!
//! - [`NativeManager`]: the distribution's own package manager and its commands
//! - [`overrides::resolve`]: generic package name to the family-specific name

mod manager;
pub mod overrides;

pub use manager::NativeManager;
