//! Per-language package managers: pip/pipx, cargo, go and gem.
//!
//! Everything installs user-scoped. Cargo and go drop binaries straight into
//! the private bin dir; pip and gem land in `~/.local/bin` or the gem bindir,
//! both of which are on the private search path.

use super::context::RunContext;
use super::executor::{AttemptError, run, run_pip};
use crate::common::command::Invocation;
use crate::common::paths::InstallPaths;
use crate::common::progress::create_spinner;
use crate::host::Ecosystem;
use crate::registry::{LanguageEcosystem, ToolSpec};
use crate::ui::prelude::*;

pub(super) fn install(
    ctx: &mut RunContext,
    tool: &ToolSpec,
    ecosystem: LanguageEcosystem,
    name: &str,
) -> Result<(), AttemptError> {
    let pb = create_spinner(format!("Installing {} via {}...", tool.name, ecosystem.as_str()));
    let result = match ecosystem {
        LanguageEcosystem::Pip => pip(ctx, name),
        LanguageEcosystem::Cargo => run(&cargo_command(&ctx.paths, name)).map(|_| ()),
        LanguageEcosystem::Go => run(&go_command(&ctx.paths, name)).map(|_| ()),
        LanguageEcosystem::Gem => gem(ctx, tool, name),
    };
    pb.finish_and_clear();
    result
}

fn pip(ctx: &RunContext, name: &str) -> Result<(), AttemptError> {
    if ctx.caps.has(Ecosystem::Pipx) {
        return run(&Invocation::new("pipx").args(["install", "--force", name])).map(|_| ());
    }

    run_pip(|break_system| pip_user_command(name, break_system)).map(|_| ())
}

fn pip_user_command(name: &str, break_system: bool) -> Invocation {
    let invocation = Invocation::new("python3").args(["-m", "pip", "install", "--user"]);
    let invocation = if break_system {
        invocation.arg("--break-system-packages")
    } else {
        invocation
    };
    invocation.arg(name)
}

/// `cargo install --root <data dir>`; cargo writes binaries to `<root>/bin`.
fn cargo_command(paths: &InstallPaths, name: &str) -> Invocation {
    Invocation::new("cargo")
        .arg("install")
        .arg("--root")
        .arg(&paths.data_dir)
        .arg(name)
}

/// Module path with `@latest` unless a version is already pinned.
fn go_target(name: &str) -> String {
    if name.contains('@') {
        name.to_string()
    } else {
        format!("{name}@latest")
    }
}

fn go_command(paths: &InstallPaths, name: &str) -> Invocation {
    Invocation::new("go")
        .args(["install".to_string(), go_target(name)])
        .env("GOBIN", &paths.bin_dir)
}

fn gem(ctx: &RunContext, tool: &ToolSpec, name: &str) -> Result<(), AttemptError> {
    let user = Invocation::new("gem")
        .args(["install", "--user-install", "--bindir"])
        .arg(&ctx.paths.bin_dir)
        .arg(name);
    let user_result = run(&user);
    if ctx.paths.locate(tool.binary).is_some() {
        return Ok(());
    }

    emit(
        Level::Debug,
        "install.gem.system_fallback",
        &format!(
            "User gem install of {} did not provide {}, trying system scope",
            name, tool.binary
        ),
        None,
    );
    let system = Invocation::new("gem").args(["install", name]).elevated();
    match run(&system) {
        Ok(_) => Ok(()),
        // Report the user-scoped failure when both fail; it is usually the informative one
        Err(err) => Err(user_result.err().unwrap_or(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;

    fn paths() -> InstallPaths {
        InstallPaths::with_root(
            PathBuf::from("/home/u/.local/share/armory"),
            &PathBuf::from("/home/u"),
            &OsString::from("/usr/bin"),
        )
        .unwrap()
    }

    #[test]
    fn test_go_target_appends_latest() {
        assert_eq!(
            go_target("github.com/ffuf/ffuf/v2"),
            "github.com/ffuf/ffuf/v2@latest"
        );
        assert_eq!(go_target("example.com/tool@v1.2.3"), "example.com/tool@v1.2.3");
    }

    #[test]
    fn test_cargo_installs_under_data_root() {
        assert_eq!(
            cargo_command(&paths(), "rustscan").display(),
            "cargo install --root /home/u/.local/share/armory rustscan"
        );
    }

    #[test]
    fn test_go_command_targets_latest() {
        assert_eq!(
            go_command(&paths(), "github.com/ropnop/kerbrute").display(),
            "go install github.com/ropnop/kerbrute@latest"
        );
    }

    #[test]
    fn test_pip_user_command() {
        assert_eq!(
            pip_user_command("sqlmap", false).display(),
            "python3 -m pip install --user sqlmap"
        );
        assert_eq!(
            pip_user_command("sqlmap", true).display(),
            "python3 -m pip install --user --break-system-packages sqlmap"
        );
    }
}
