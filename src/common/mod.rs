pub mod command;
pub mod config;
pub mod distro;
pub mod git;
pub mod package;
pub mod paths;
pub mod progress;
pub mod shell;
