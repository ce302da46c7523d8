//! Captured subprocess execution.
//!
//! Every installer command goes through [`Invocation`] so its exit code,
//! stdout and stderr are kept for diagnostics instead of being printed.

use duct::cmd;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::ui::prelude::*;

/// Result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Last non-empty stderr line, used for short failure reasons.
    pub fn stderr_tail(&self) -> Option<&str> {
        self.stderr.lines().rev().map(str::trim).find(|l| !l.is_empty())
    }
}

/// Whether the current process already has root privileges.
pub fn running_as_root() -> bool {
    matches!(sudo::check(), sudo::RunningAs::Root)
}

/// A command line to run with captured output.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
    dir: Option<PathBuf>,
    env: Vec<(String, OsString)>,
    elevate: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: None,
            env: Vec::new(),
            elevate: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Prefix with `sudo` unless we already run as root.
    pub fn elevated(mut self) -> Self {
        self.elevate = true;
        self
    }

    /// Human readable command line for logs.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        if self.needs_sudo() {
            parts.push("sudo".to_string());
        }
        parts.push(self.program.clone());
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }

    fn needs_sudo(&self) -> bool {
        self.elevate && !running_as_root()
    }

    /// Run to completion and capture everything. Only spawn failures are
    /// errors; a non-zero exit is reported through [`CommandOutput`].
    pub fn run(&self) -> std::io::Result<CommandOutput> {
        emit(
            Level::Debug,
            "command.run",
            &format!("{} {}", char::from(NerdFont::Terminal), self.display()),
            None,
        );

        let expression = if self.needs_sudo() {
            let mut args: Vec<OsString> = vec![OsString::from(&self.program)];
            args.extend(self.args.iter().cloned());
            cmd("sudo", args)
        } else {
            cmd(self.program.as_str(), &self.args)
        };

        let mut expression = expression.stdout_capture().stderr_capture().unchecked();
        if let Some(dir) = &self.dir {
            expression = expression.dir(dir);
        }
        for (key, value) in &self.env {
            expression = expression.env(key, value);
        }

        let output = expression.run()?;
        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
