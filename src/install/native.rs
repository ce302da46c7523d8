use super::context::{RefreshGate, RunContext};
use super::executor::{AttemptError, run};
use crate::common::command::Invocation;
use crate::common::distro::DistroFamily;
use crate::common::package::{NativeManager, overrides};
use crate::common::progress::create_spinner;
use crate::ui::prelude::*;

/// Generic packages `prerequisites --install` pulls in: the toolchains the
/// other install methods rely on.
pub const BASE_PREREQUISITES: &[&str] = &[
    "git",
    "curl",
    "wget",
    "python3",
    "python3-pip",
    "python3-venv",
    "build-essential",
    "libpcap-dev",
    "libssl-dev",
];

/// Commands for one native install: an optional metadata refresh (only the
/// first time the gate is claimed) followed by the install itself.
pub(crate) fn plan(
    manager: NativeManager,
    family: DistroFamily,
    generics: &[&str],
    gate: &mut RefreshGate,
) -> (Option<Invocation>, Invocation) {
    let refresh = manager
        .refresh_args()
        .filter(|_| gate.claim())
        .map(|args| Invocation::new(manager.binary()).args(args).elevated());

    let mut packages: Vec<&str> = Vec::with_capacity(generics.len());
    for generic in generics {
        let package = overrides::resolve(family, generic);
        if !packages.contains(&package) {
            packages.push(package);
        }
    }
    let install = Invocation::new(manager.binary())
        .args(manager.install_args())
        .args(packages)
        .elevated();

    (refresh, install)
}

pub(super) fn install(ctx: &mut RunContext, generic: &str) -> Result<(), AttemptError> {
    install_packages(ctx, &[generic])
}

/// Install generic packages through the native manager in one transaction.
pub fn install_packages(ctx: &mut RunContext, generics: &[&str]) -> Result<(), AttemptError> {
    let manager = ctx.caps.native_manager().ok_or(AttemptError::NotApplicable)?;
    let (refresh, install) = plan(manager, ctx.caps.family, generics, &mut ctx.refresh);

    if let Some(refresh) = refresh {
        let pb = create_spinner(format!("Refreshing {} package metadata...", manager));
        let result = run(&refresh);
        pb.finish_and_clear();
        // A stale index can still serve the install
        if let Err(err) = result {
            emit(
                Level::Warn,
                "install.native.refresh_failed",
                &format!(
                    "{} {} metadata refresh failed: {}",
                    char::from(NerdFont::Warning),
                    manager,
                    err
                ),
                None,
            );
        }
    }

    let pb = create_spinner(format!("Installing {} via {}...", generics.join(" "), manager));
    let result = run(&install);
    pb.finish_and_clear();
    result.map(|_| ())
}
