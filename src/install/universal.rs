use std::path::Path;

use super::context::RunContext;
use super::executor::{AttemptError, run};
use crate::common::command::{Invocation, running_as_root};
use crate::common::progress::create_spinner;
use crate::common::shell::{shell_quote, write_script};
use crate::registry::{ToolSpec, UniversalEcosystem};
use crate::ui::prelude::*;

const FLATHUB: &str = "flathub";

pub(super) fn install(
    ctx: &mut RunContext,
    tool: &ToolSpec,
    ecosystem: UniversalEcosystem,
    id: &str,
) -> Result<(), AttemptError> {
    let pb = create_spinner(format!("Installing {} via {}...", tool.name, ecosystem.as_str()));
    let result = match ecosystem {
        UniversalEcosystem::Snap => snap(ctx, tool, id),
        UniversalEcosystem::Flatpak => flatpak(ctx, tool, id),
    };
    pb.finish_and_clear();
    result
}

/// Run `unprivileged`; when that fails and `done` still reports false, run
/// `elevated` once.
fn with_sudo_retry(
    unprivileged: Invocation,
    elevated: Invocation,
    done: impl Fn() -> bool,
) -> Result<(), AttemptError> {
    let first = run(&unprivileged);
    if done() {
        return Ok(());
    }
    if running_as_root() {
        return first.map(|_| ());
    }
    if let Err(err) = &first {
        emit(
            Level::Debug,
            "install.universal.sudo_retry",
            &format!("{}; retrying with sudo", err),
            None,
        );
    }
    run(&elevated).map(|_| ())
}

fn snap(ctx: &RunContext, tool: &ToolSpec, id: &str) -> Result<(), AttemptError> {
    let command = Invocation::new("snap").args(["install", id]);
    with_sudo_retry(command.clone(), command.elevated(), || {
        ctx.paths.locate(tool.binary).is_some() || ctx.paths.locate(id).is_some()
    })?;

    // Snaps expose their command under the snap name, which may differ
    // from the binary the registry expects
    if ctx.paths.locate(tool.binary).is_none()
        && let Some(exposed) = ctx.paths.locate(id)
    {
        link_into_bin(&exposed, &ctx.paths.bin_dir.join(tool.binary))?;
    }
    Ok(())
}

fn flatpak(ctx: &RunContext, tool: &ToolSpec, id: &str) -> Result<(), AttemptError> {
    let installed = || {
        Invocation::new("flatpak")
            .args(["info", id])
            .run()
            .is_ok_and(|out| out.success())
    };

    with_sudo_retry(
        Invocation::new("flatpak").args(["install", "--user", "-y", "--noninteractive", FLATHUB, id]),
        Invocation::new("flatpak")
            .args(["install", "-y", "--noninteractive", FLATHUB, id])
            .elevated(),
        installed,
    )?;

    let wrapper = ctx.paths.bin_dir.join(tool.binary);
    write_script(&wrapper, &flatpak_wrapper(id))?;
    Ok(())
}

/// Forwarding script that runs a flatpak app under the registry's binary name.
fn flatpak_wrapper(id: &str) -> String {
    format!("exec flatpak run {} \"$@\"", shell_quote(id))
}

fn link_into_bin(target: &Path, link: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    if link.exists() || link.is_symlink() {
        std::fs::remove_file(link).with_context(|| format!("removing {}", link.display()))?;
    }
    std::os::unix::fs::symlink(target, link)
        .with_context(|| format!("linking {} -> {}", link.display(), target.display()))
}
