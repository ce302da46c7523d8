//! Host environment probing.
//!
//! [`SystemCapabilities`] is computed once at startup and then only read:
//! distro family, native package manager, architecture spellings and which
//! secondary ecosystems are reachable on `PATH`.

mod arch;

pub use arch::ArchSpellings;

use std::collections::BTreeSet;
use std::fmt;

use crate::common::command::Invocation;
use crate::common::distro::{DistroFamily, OsRelease};
use crate::common::package::NativeManager;

/// Secondary tooling an install method may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ecosystem {
    Python3,
    Pip,
    Pipx,
    Cargo,
    Go,
    Gem,
    Snap,
    Flatpak,
    Git,
    Curl,
    Wget,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 11] = [
        Self::Python3,
        Self::Pip,
        Self::Pipx,
        Self::Cargo,
        Self::Go,
        Self::Gem,
        Self::Snap,
        Self::Flatpak,
        Self::Git,
        Self::Curl,
        Self::Wget,
    ];

    /// Binaries whose presence means the ecosystem is available.
    pub fn binaries(&self) -> &'static [&'static str] {
        match self {
            Self::Python3 => &["python3"],
            Self::Pip => &["pip3", "pip"],
            Self::Pipx => &["pipx"],
            Self::Cargo => &["cargo"],
            Self::Go => &["go"],
            Self::Gem => &["gem"],
            Self::Snap => &["snap"],
            Self::Flatpak => &["flatpak"],
            Self::Git => &["git"],
            Self::Curl => &["curl"],
            Self::Wget => &["wget"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python3 => "python3",
            Self::Pip => "pip",
            Self::Pipx => "pipx",
            Self::Cargo => "cargo",
            Self::Go => "go",
            Self::Gem => "gem",
            Self::Snap => "snap",
            Self::Flatpak => "flatpak",
            Self::Git => "git",
            Self::Curl => "curl",
            Self::Wget => "wget",
        }
    }

    /// Generic package providing this ecosystem, for `prerequisites --install`.
    pub fn package(&self) -> &'static str {
        match self {
            Self::Python3 => "python3",
            Self::Pip => "python3-pip",
            Self::Pipx => "pipx",
            Self::Cargo => "cargo",
            Self::Go => "golang",
            Self::Gem => "ruby",
            Self::Snap => "snapd",
            Self::Flatpak => "flatpak",
            Self::Git => "git",
            Self::Curl => "curl",
            Self::Wget => "wget",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable facts about the host, computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemCapabilities {
    /// os-release `ID`, or `unknown`.
    pub distro_id: String,
    pub family: DistroFamily,
    pub package_manager: Option<NativeManager>,
    pub arch: ArchSpellings,
    ecosystems: BTreeSet<Ecosystem>,
}

impl SystemCapabilities {
    /// Inspect the running host.
    pub fn detect() -> Self {
        Self::detect_with(OsRelease::read(), &host_machine(), |binary| {
            which::which(binary).is_ok()
        })
    }

    /// Inspect with explicit inputs. `on_path` answers whether a binary is on `PATH`.
    pub fn detect_with(
        release: Option<OsRelease>,
        machine: &str,
        on_path: impl Fn(&str) -> bool,
    ) -> Self {
        let distro_id = release
            .as_ref()
            .map(|r| r.id.clone())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let (family, package_manager) =
            match release.as_ref().and_then(OsRelease::family) {
                Some(family) => {
                    let manager = NativeManager::candidates_for(family)
                        .iter()
                        .copied()
                        .find(|m| on_path(m.binary()));
                    (family, manager)
                }
                None => NativeManager::DETECTION_ORDER
                    .iter()
                    .copied()
                    .find(|m| on_path(m.binary()))
                    .map(|m| (m.family(), Some(m)))
                    .unwrap_or((DistroFamily::Unknown, None)),
            };

        let ecosystems = Ecosystem::ALL
            .into_iter()
            .filter(|eco| eco.binaries().iter().any(|b| on_path(b)))
            .collect();

        Self {
            distro_id,
            family,
            package_manager,
            arch: ArchSpellings::from_machine(machine),
            ecosystems,
        }
    }

    pub fn has(&self, ecosystem: Ecosystem) -> bool {
        self.ecosystems.contains(&ecosystem)
    }

    /// Native installs need both a recognized family and its manager binary.
    pub fn native_manager(&self) -> Option<NativeManager> {
        if self.family.is_known() {
            self.package_manager
        } else {
            None
        }
    }
}

/// Machine name of the running kernel (`uname -m`), falling back to the
/// architecture armory was built for.
pub fn host_machine() -> String {
    Invocation::new("uname")
        .arg("-m")
        .run()
        .ok()
        .filter(|out| out.success())
        .map(|out| out.stdout.trim().to_string())
        .filter(|machine| !machine.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string())
}
