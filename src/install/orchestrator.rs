use colored::*;
use thiserror::Error;

use super::executor::{AttemptError, Executor};
use crate::registry::{Category, MethodSpec, ToolRegistry, ToolSpec};
use crate::ui::prelude::*;

/// Which tools an install run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    All,
    Category(Category),
    Tool(&'a str),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
}

impl Selector<'_> {
    pub fn select<'r>(&self, registry: &'r ToolRegistry) -> Result<Vec<&'r ToolSpec>, SelectionError> {
        match self {
            Self::All => Ok(registry.all().iter().collect()),
            Self::Category(category) => Ok(registry.by_category(*category).collect()),
            Self::Tool(name) => registry
                .get(name)
                .map(|tool| vec![tool])
                .ok_or_else(|| SelectionError::UnknownTool(name.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    Installed(MethodSpec),
    AlreadyPresent,
    Exhausted,
}

/// One method that was actually tried. `failure` is `None` for the method
/// that produced the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub method: MethodSpec,
    pub failure: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub tool: &'static str,
    pub kind: OutcomeKind,
    pub attempts: Vec<AttemptRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub outcomes: Vec<InstallOutcome>,
}

impl Summary {
    fn count(&self, f: impl Fn(&OutcomeKind) -> bool) -> usize {
        self.outcomes.iter().filter(|o| f(&o.kind)).count()
    }

    pub fn installed(&self) -> usize {
        self.count(|k| matches!(k, OutcomeKind::Installed(_)))
    }

    pub fn already_present(&self) -> usize {
        self.count(|k| matches!(k, OutcomeKind::AlreadyPresent))
    }

    pub fn exhausted(&self) -> usize {
        self.count(|k| matches!(k, OutcomeKind::Exhausted))
    }
}

/// Install every selected tool, in registry order. A tool that cannot be
/// installed is recorded and the batch continues.
pub fn install_tools<E: Executor + ?Sized>(
    executor: &mut E,
    registry: &ToolRegistry,
    selector: Selector<'_>,
    diagnostics: bool,
) -> Result<Summary, SelectionError> {
    let tools = selector.select(registry)?;
    let mut summary = Summary::default();
    for tool in tools {
        let outcome = install_tool(executor, tool);
        if diagnostics && outcome.kind == OutcomeKind::Exhausted {
            print_attempts(&outcome);
        }
        summary.outcomes.push(outcome);
    }
    Ok(summary)
}

/// Obtain one tool: nothing happens when it is already present, otherwise
/// methods are tried in declared order until the binary shows up.
pub fn install_tool<E: Executor + ?Sized>(executor: &mut E, tool: &ToolSpec) -> InstallOutcome {
    if let Some(path) = executor.locate(tool.binary) {
        emit(
            Level::Info,
            "install.already_present",
            &format!(
                "{} {} already installed ({})",
                char::from(NerdFont::Check),
                tool.name.bold(),
                path.display()
            ),
            Some(serde_json::json!({ "tool": tool.name, "path": path })),
        );
        return InstallOutcome {
            tool: tool.name,
            kind: OutcomeKind::AlreadyPresent,
            attempts: Vec::new(),
        };
    }

    let mut attempts = Vec::new();
    for method in tool.methods {
        if !executor.is_applicable(method) {
            emit(
                Level::Debug,
                "install.method.skipped",
                &format!("{}: skipping {} (not available here)", tool.name, method),
                None,
            );
            continue;
        }

        emit(
            Level::Info,
            "install.method.start",
            &format!(
                "{} {}: trying {}",
                char::from(NerdFont::Download),
                tool.name.bold(),
                method
            ),
            None,
        );

        let result = executor.attempt(tool, method);
        // Success is whatever the presence check says, not the exit status
        if executor.locate(tool.binary).is_some() {
            emit(
                Level::Success,
                "install.method.succeeded",
                &format!(
                    "{} {} installed via {}",
                    char::from(NerdFont::Check),
                    tool.name,
                    method.label()
                ),
                Some(serde_json::json!({ "tool": tool.name, "method": method.to_string() })),
            );
            attempts.push(AttemptRecord {
                method: *method,
                failure: None,
            });
            return InstallOutcome {
                tool: tool.name,
                kind: OutcomeKind::Installed(*method),
                attempts,
            };
        }

        let failure = match result {
            Err(AttemptError::NotApplicable) => continue,
            Err(err) => err.reason(),
            Ok(()) => AttemptError::BinaryNotFound {
                binary: tool.binary.to_string(),
            }
            .reason(),
        };
        emit(
            Level::Warn,
            "install.method.failed",
            &format!("{} {}: {} failed", char::from(NerdFont::Cross), tool.name, method.label()),
            Some(serde_json::json!({ "tool": tool.name, "method": method.to_string(), "reason": failure })),
        );
        attempts.push(AttemptRecord {
            method: *method,
            failure: Some(failure),
        });
    }

    emit(
        Level::Error,
        "install.exhausted",
        &format!(
            "{} {}: no install method succeeded",
            char::from(NerdFont::Cross),
            tool.name
        ),
        Some(serde_json::json!({ "tool": tool.name, "attempted": attempts.len() })),
    );
    InstallOutcome {
        tool: tool.name,
        kind: OutcomeKind::Exhausted,
        attempts,
    }
}

fn print_attempts(outcome: &InstallOutcome) {
    if outcome.attempts.is_empty() {
        emit(
            Level::Info,
            "install.diagnostics",
            &format!("  {}: no applicable install method on this system", outcome.tool),
            None,
        );
        return;
    }
    for attempt in &outcome.attempts {
        emit(
            Level::Info,
            "install.diagnostics",
            &format!(
                "  {} {}: {}",
                char::from(NerdFont::Bug),
                attempt.method,
                attempt.failure.as_deref().unwrap_or("ok")
            ),
            Some(serde_json::json!({
                "tool": outcome.tool,
                "method": attempt.method.to_string(),
                "reason": attempt.failure,
            })),
        );
    }
}
