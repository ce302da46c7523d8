//! Native package manager enum and related functionality.

use crate::common::distro::DistroFamily;

/// The distribution's own package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeManager {
    /// APT - Debian/Ubuntu family
    Apt,
    /// DNF - Fedora/RHEL family
    Dnf,
    /// YUM - older RHEL/CentOS
    Yum,
    /// Pacman - Arch Linux family
    Pacman,
    /// Zypper - openSUSE/SLES
    Zypper,
    /// apk - Alpine
    Apk,
    /// xbps - Void
    Xbps,
    /// Portage - Gentoo
    Emerge,
}

impl NativeManager {
    /// Detection order used when the distribution cannot be identified.
    pub const DETECTION_ORDER: [NativeManager; 8] = [
        Self::Apt,
        Self::Dnf,
        Self::Yum,
        Self::Pacman,
        Self::Zypper,
        Self::Apk,
        Self::Xbps,
        Self::Emerge,
    ];

    /// Binary whose presence on `PATH` identifies this manager.
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Pacman => "pacman",
            Self::Zypper => "zypper",
            Self::Apk => "apk",
            Self::Xbps => "xbps-install",
            Self::Emerge => "emerge",
        }
    }

    pub fn family(&self) -> DistroFamily {
        match self {
            Self::Apt => DistroFamily::Debian,
            Self::Dnf | Self::Yum => DistroFamily::Redhat,
            Self::Pacman => DistroFamily::Arch,
            Self::Zypper => DistroFamily::Suse,
            Self::Apk => DistroFamily::Alpine,
            Self::Xbps => DistroFamily::Void,
            Self::Emerge => DistroFamily::Gentoo,
        }
    }

    /// Managers a family may use, preferred first.
    pub fn candidates_for(family: DistroFamily) -> &'static [NativeManager] {
        match family {
            DistroFamily::Debian => &[Self::Apt],
            DistroFamily::Redhat => &[Self::Dnf, Self::Yum],
            DistroFamily::Arch => &[Self::Pacman],
            DistroFamily::Suse => &[Self::Zypper],
            DistroFamily::Alpine => &[Self::Apk],
            DistroFamily::Void => &[Self::Xbps],
            DistroFamily::Gentoo => &[Self::Emerge],
            DistroFamily::Unknown => &[],
        }
    }

    /// Non-interactive install command arguments (run elevated).
    pub fn install_args(&self) -> &'static [&'static str] {
        match self {
            Self::Apt => &["install", "-y"],
            Self::Dnf => &["install", "-y"],
            Self::Yum => &["install", "-y"],
            Self::Pacman => &["-S", "--noconfirm", "--needed"],
            Self::Zypper => &["--non-interactive", "install"],
            Self::Apk => &["add"],
            Self::Xbps => &["-y"],
            Self::Emerge => &["--noreplace"],
        }
    }

    /// Metadata refresh required before the first install of a run, if any.
    pub fn refresh_args(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Apt => Some(&["update"]),
            Self::Pacman => Some(&["-Sy"]),
            Self::Zypper => Some(&["--non-interactive", "refresh"]),
            Self::Apk => Some(&["update"]),
            Self::Xbps => Some(&["-S"]),
            Self::Dnf | Self::Yum | Self::Emerge => None,
        }
    }

    /// Get a human-readable name for this package manager.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Apt => "APT",
            Self::Dnf => "DNF",
            Self::Yum => "YUM",
            Self::Pacman => "Pacman",
            Self::Zypper => "Zypper",
            Self::Apk => "apk",
            Self::Xbps => "XBPS",
            Self::Emerge => "Portage",
        }
    }

    /// Install hint such as `apt-get install -y nmap`.
    pub fn install_hint(&self, package: &str) -> String {
        format!("{} {} {}", self.binary(), self.install_args().join(" "), package)
    }
}

impl std::fmt::Display for NativeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
