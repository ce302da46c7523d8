use std::path::PathBuf;
use thiserror::Error;

use super::context::RunContext;
use super::{github, interpreted, language, native, source, universal};
use crate::common::command::{CommandOutput, Invocation};
use crate::host::{Ecosystem, SystemCapabilities};
use crate::registry::{LanguageEcosystem, MethodSpec, ToolSpec, UniversalEcosystem};
use crate::ui::prelude::*;

/// What pip prints when the interpreter is marked externally managed.
const EXTERNALLY_MANAGED: &str = "externally-managed-environment";

/// Why a single method attempt did not produce the tool.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("method not applicable on this system")]
    NotApplicable,
    #[error("`{command}` exited with {}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: Option<String>,
    },
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("GitHub API rate limit exceeded (set GITHUB_TOKEN to raise it)")]
    RateLimited,
    #[error("no release asset of {repo} matches this system")]
    NoMatchingAsset { repo: String },
    #[error("`{binary}` not found after install")]
    BinaryNotFound { binary: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl AttemptError {
    /// One-line reason for the diagnostic report.
    pub fn reason(&self) -> String {
        match self {
            Self::CommandFailed {
                stderr: Some(tail), ..
            } => format!("{self}: {tail}"),
            _ => format!("{self:#}"),
        }
    }
}

/// Run a command; a non-zero exit becomes [`AttemptError::CommandFailed`].
pub(crate) fn run(invocation: &Invocation) -> Result<CommandOutput, AttemptError> {
    let output = spawn(invocation)?;
    check(invocation, output)
}

/// Run a command, failing only when it cannot be started.
pub(crate) fn spawn(invocation: &Invocation) -> Result<CommandOutput, AttemptError> {
    invocation.run().map_err(|source| AttemptError::Spawn {
        program: invocation.display(),
        source,
    })
}

pub(crate) fn check(
    invocation: &Invocation,
    output: CommandOutput,
) -> Result<CommandOutput, AttemptError> {
    if output.success() {
        Ok(output)
    } else {
        Err(AttemptError::CommandFailed {
            command: invocation.display(),
            code: output.exit_code,
            stderr: output.stderr_tail().map(str::to_string),
        })
    }
}

/// Run a pip install built by `build(false)`. Distros that mark the system
/// interpreter as externally managed refuse it, in which case `build(true)`
/// (carrying `--break-system-packages`) runs instead.
pub(crate) fn run_pip(build: impl Fn(bool) -> Invocation) -> Result<CommandOutput, AttemptError> {
    let first = build(false);
    let output = spawn(&first)?;
    if !output.success() && output.stderr.contains(EXTERNALLY_MANAGED) {
        emit(
            Level::Debug,
            "install.pip.externally_managed",
            &format!("Retrying `{}` with --break-system-packages", first.display()),
            None,
        );
        return run(&build(true));
    }
    check(&first, output)
}

/// Whether `method` can run on a host with `caps`.
pub fn applicable(caps: &SystemCapabilities, method: &MethodSpec) -> bool {
    match method {
        MethodSpec::NativePackage(_) => caps.native_manager().is_some(),
        MethodSpec::LanguagePackage { ecosystem, .. } => match ecosystem {
            LanguageEcosystem::Pip => {
                caps.has(Ecosystem::Pipx)
                    || (caps.has(Ecosystem::Python3) && caps.has(Ecosystem::Pip))
            }
            LanguageEcosystem::Cargo => caps.has(Ecosystem::Cargo),
            LanguageEcosystem::Go => caps.has(Ecosystem::Go),
            LanguageEcosystem::Gem => caps.has(Ecosystem::Gem),
        },
        MethodSpec::UniversalPackage { ecosystem, .. } => match ecosystem {
            UniversalEcosystem::Snap => caps.has(Ecosystem::Snap),
            UniversalEcosystem::Flatpak => caps.has(Ecosystem::Flatpak),
        },
        // Clones go through libgit2 and downloads through reqwest
        MethodSpec::GitHubRelease { .. } | MethodSpec::SourceBuild { .. } => true,
        MethodSpec::SourceInterpreted { .. } => caps.has(Ecosystem::Python3),
    }
}

/// What the orchestrator needs from the outside world.
pub trait Executor {
    /// Presence check for a binary on the private search path.
    fn locate(&self, binary: &str) -> Option<PathBuf>;

    /// Whether the method's ecosystem exists on this host.
    fn is_applicable(&self, method: &MethodSpec) -> bool;

    /// Try one method. The result explains failures only; success is
    /// decided by the caller's presence check afterwards.
    fn attempt(&mut self, tool: &ToolSpec, method: &MethodSpec) -> Result<(), AttemptError>;
}

impl Executor for RunContext {
    fn locate(&self, binary: &str) -> Option<PathBuf> {
        self.paths.locate(binary)
    }

    fn is_applicable(&self, method: &MethodSpec) -> bool {
        applicable(&self.caps, method)
    }

    fn attempt(&mut self, tool: &ToolSpec, method: &MethodSpec) -> Result<(), AttemptError> {
        if !self.is_applicable(method) {
            return Err(AttemptError::NotApplicable);
        }
        match *method {
            MethodSpec::NativePackage(name) => native::install(self, name),
            MethodSpec::LanguagePackage { ecosystem, name } => {
                language::install(self, tool, ecosystem, name)
            }
            MethodSpec::UniversalPackage { ecosystem, id } => {
                universal::install(self, tool, ecosystem, id)
            }
            MethodSpec::GitHubRelease { repo, asset } => github::install(self, tool, repo, asset),
            MethodSpec::SourceBuild { url, build } => source::install(self, tool, url, build),
            MethodSpec::SourceInterpreted { repo } => interpreted::install(self, tool, repo),
        }
    }
}
