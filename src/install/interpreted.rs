//! Python projects run straight from a private checkout.
//!
//! The checkout lives in `<opt dir>/<tool>` with its own virtual environment.
//! A small forwarding script in the private bin dir makes it callable under
//! the registry's binary name.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

use super::context::RunContext;
use super::executor::{AttemptError, run, run_pip};
use crate::common::command::Invocation;
use crate::common::git;
use crate::common::paths::InstallPaths;
use crate::common::progress::create_spinner;
use crate::common::shell::{shell_quote, write_script};
use crate::registry::ToolSpec;
use crate::ui::prelude::*;

const VENV_DIR: &str = ".venv";
const SYSTEM_PYTHON: &str = "python3";

/// Interpreter the project runs under.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Interpreter {
    Venv(PathBuf),
    /// The host interpreter, used when no venv could be created.
    System(String),
}

impl Interpreter {
    fn program(&self) -> String {
        match self {
            Self::Venv(python) => python.to_string_lossy().into_owned(),
            Self::System(python) => python.clone(),
        }
    }

    /// `pip install` for this interpreter. Outside a venv installs are
    /// user-scoped, optionally overriding an externally managed Python.
    fn pip_install(&self, break_system: bool) -> Invocation {
        let invocation = Invocation::new(self.program()).args(["-m", "pip", "install"]);
        match self {
            Self::Venv(_) => invocation,
            Self::System(_) if break_system => {
                invocation.args(["--user", "--break-system-packages"])
            }
            Self::System(_) => invocation.arg("--user"),
        }
    }
}

/// How the tool is started, first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// A script file in the project root.
    Script(PathBuf),
    /// A package run with `python -m`.
    Module(String),
    /// A console script generated by packaging, linked as is.
    ConsoleScript(PathBuf),
}

pub(super) fn install(ctx: &mut RunContext, tool: &ToolSpec, repo: &str) -> Result<(), AttemptError> {
    checkout_and_expose(&ctx.paths, tool, repo, SYSTEM_PYTHON)
}

/// Clone `repo` into the opt dir, prepare it with `python` and link the
/// entry point into the private bin dir.
fn checkout_and_expose(
    paths: &InstallPaths,
    tool: &ToolSpec,
    repo: &str,
    python: &str,
) -> Result<(), AttemptError> {
    let project = paths.opt_dir.join(tool.name);
    if project.exists() {
        fs::remove_dir_all(&project)
            .with_context(|| format!("removing stale checkout {}", project.display()))?;
    }

    let pb = create_spinner(format!("Cloning {}...", repo));
    let cloned = git::shallow_clone(repo, &project);
    pb.finish_and_clear();
    cloned?;

    let pb = create_spinner(format!("Preparing Python environment for {}...", tool.name));
    let prepared = prepare(&project, python);
    pb.finish_and_clear();
    let interpreter = prepared?;

    let entry = resolve_entry(&project, tool.binary).ok_or_else(|| AttemptError::BinaryNotFound {
        binary: tool.binary.to_string(),
    })?;
    emit(
        Level::Debug,
        "install.interpreted.entry",
        &format!("{} entry point: {:?}", tool.name, entry),
        None,
    );

    expose(&entry, &interpreter, &project, &paths.bin_dir.join(tool.binary))?;
    Ok(())
}

/// Create the venv (or fall back to the system interpreter) and install
/// the project's dependencies.
fn prepare(project: &Path, python: &str) -> Result<Interpreter, AttemptError> {
    let venv = project.join(VENV_DIR);
    let interpreter = match run(&Invocation::new(python).arg("-m").arg("venv").arg(&venv)) {
        Ok(_) => Interpreter::Venv(venv.join("bin").join("python")),
        Err(err) => {
            emit(
                Level::Warn,
                "install.interpreted.venv_failed",
                &format!(
                    "{} Could not create a virtual environment ({}); using system {}",
                    char::from(NerdFont::Warning),
                    err,
                    python
                ),
                None,
            );
            Interpreter::System(python.to_string())
        }
    };

    if project.join("requirements.txt").is_file() {
        run_pip(|break_system| {
            interpreter
                .pip_install(break_system)
                .args(["-r", "requirements.txt"])
                .dir(project)
        })?;
    }
    if project.join("setup.py").is_file() || project.join("pyproject.toml").is_file() {
        run_pip(|break_system| interpreter.pip_install(break_system).arg(".").dir(project))?;
    }

    Ok(interpreter)
}

/// Find how to start the tool inside `project`.
pub fn resolve_entry(project: &Path, binary: &str) -> Option<EntryPoint> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(project).ok()?.filter_map(|e| e.ok()) {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if file_type.is_file() {
            files.push(name);
        } else if file_type.is_dir() && !name.starts_with('.') {
            dirs.push(name);
        }
    }
    files.sort();
    dirs.sort();

    let with_py = format!("{binary}.py");
    for wanted in [binary, with_py.as_str()] {
        if let Some(name) = files.iter().find(|f| f.eq_ignore_ascii_case(wanted)) {
            return Some(EntryPoint::Script(project.join(name)));
        }
    }

    for wanted in ["main.py", "__main__.py"] {
        if files.iter().any(|f| f == wanted) {
            return Some(EntryPoint::Script(project.join(wanted)));
        }
    }

    let runnable: Vec<&String> = dirs
        .iter()
        .filter(|d| project.join(d).join("__main__.py").is_file())
        .collect();
    if let Some(package) = runnable
        .iter()
        .find(|d| d.eq_ignore_ascii_case(binary))
        .or_else(|| runnable.first())
    {
        return Some(EntryPoint::Module((*package).clone()));
    }

    let console = project.join(VENV_DIR).join("bin").join(binary);
    console.is_file().then_some(EntryPoint::ConsoleScript(console))
}

/// Body of the forwarding script for script and module entry points.
fn forwarding_script(project: &Path, python: &str, entry: &EntryPoint) -> Option<String> {
    let target = match entry {
        EntryPoint::Script(path) => shell_quote(&path.to_string_lossy()),
        EntryPoint::Module(package) => format!("-m {}", shell_quote(package)),
        EntryPoint::ConsoleScript(_) => return None,
    };
    Some(format!(
        "cd {} && exec {} {} \"$@\"",
        shell_quote(&project.to_string_lossy()),
        shell_quote(python),
        target
    ))
}

fn expose(
    entry: &EntryPoint,
    interpreter: &Interpreter,
    project: &Path,
    dest: &Path,
) -> anyhow::Result<()> {
    match forwarding_script(project, &interpreter.program(), entry) {
        Some(body) => write_script(dest, &body),
        None => {
            let EntryPoint::ConsoleScript(target) = entry else {
                return Ok(());
            };
            if dest.exists() || dest.is_symlink() {
                fs::remove_file(dest).with_context(|| format!("removing {}", dest.display()))?;
            }
            std::os::unix::fs::symlink(target, dest)
                .with_context(|| format!("linking {} -> {}", dest.display(), target.display()))
        }
    }
}
