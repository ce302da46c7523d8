use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Linux distribution families sharing one native package manager and
/// package naming conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DistroFamily {
    Debian,
    Redhat,
    Arch,
    Suse,
    Alpine,
    Void,
    Gentoo,
    Unknown,
}

impl DistroFamily {
    pub const ALL: [DistroFamily; 8] = [
        Self::Debian,
        Self::Redhat,
        Self::Arch,
        Self::Suse,
        Self::Alpine,
        Self::Void,
        Self::Gentoo,
        Self::Unknown,
    ];

    /// Map an os-release `ID` (or one `ID_LIKE` word) to its family.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().to_ascii_lowercase();
        let family = match id.as_str() {
            "debian" | "ubuntu" | "linuxmint" | "pop" | "kali" | "parrot" | "raspbian"
            | "elementary" | "zorin" | "neon" | "devuan" => Self::Debian,
            "fedora" | "rhel" | "centos" | "rocky" | "almalinux" | "ol" | "amzn" => Self::Redhat,
            "arch" | "manjaro" | "endeavouros" | "garuda" | "artix" | "instantos"
            | "blackarch" | "archarm" => Self::Arch,
            "suse" | "sles" | "sled" | "opensuse" | "opensuse-leap" | "opensuse-tumbleweed" => {
                Self::Suse
            }
            "alpine" => Self::Alpine,
            "void" => Self::Void,
            "gentoo" | "funtoo" => Self::Gentoo,
            _ => return None,
        };
        Some(family)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Redhat => "redhat",
            Self::Arch => "arch",
            Self::Suse => "suse",
            Self::Alpine => "alpine",
            Self::Void => "void",
            Self::Gentoo => "gentoo",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for DistroFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistroFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown distro family: {}", s))
    }
}

/// The identifier fields of `/etc/os-release`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: String,
    pub id_like: Vec<String>,
}

impl OsRelease {
    pub const PATH: &'static str = "/etc/os-release";

    /// Read `/etc/os-release`, `None` if missing or unreadable.
    pub fn read() -> Option<Self> {
        Self::read_from(Path::new(Self::PATH))
    }

    pub fn read_from(path: &Path) -> Option<Self> {
        fs::read_to_string(path).ok().map(|c| Self::parse(&c))
    }

    pub fn parse(content: &str) -> Self {
        let mut release = Self::default();

        for line in content.lines() {
            if let Some(val) = line.strip_prefix("ID=") {
                release.id = unquote(val).to_ascii_lowercase();
            } else if let Some(val) = line.strip_prefix("ID_LIKE=") {
                release.id_like = unquote(val)
                    .split_whitespace()
                    .map(|s| s.to_ascii_lowercase())
                    .collect();
            }
        }

        release
    }

    /// Family from `ID`, then from each `ID_LIKE` entry in order.
    pub fn family(&self) -> Option<DistroFamily> {
        DistroFamily::from_id(&self.id)
            .or_else(|| self.id_like.iter().find_map(|id| DistroFamily::from_id(id)))
    }
}

fn unquote(val: &str) -> &str {
    val.trim().trim_matches('"').trim_matches('\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arch() {
        let content = r#"NAME="Arch Linux"
PRETTY_NAME="Arch Linux"
ID=arch
BUILD_ID=rolling
ANSI_COLOR="38;2;23;147;209"
HOME_URL="https://archlinux.org/"
LOGO=archlinux-logo"#;
        let release = OsRelease::parse(content);
        assert_eq!(release.id, "arch");
        assert_eq!(release.family(), Some(DistroFamily::Arch));
    }

    #[test]
    fn test_parse_ubuntu() {
        let content = r#"PRETTY_NAME="Ubuntu 22.04.3 LTS"
NAME="Ubuntu"
VERSION_ID="22.04"
ID=ubuntu
ID_LIKE=debian
UBUNTU_CODENAME=jammy"#;
        assert_eq!(
            OsRelease::parse(content).family(),
            Some(DistroFamily::Debian)
        );
    }

    #[test]
    fn test_parse_kali() {
        let content = "ID=kali\nID_LIKE=debian\nVERSION_ID=\"2024.1\"";
        assert_eq!(
            OsRelease::parse(content).family(),
            Some(DistroFamily::Debian)
        );
    }

    #[test]
    fn test_unknown_id_uses_id_like() {
        let content = r#"NAME="Custom Distro"
ID="customrolling"
ID_LIKE="rhel centos fedora""#;
        let release = OsRelease::parse(content);
        assert_eq!(release.id, "customrolling");
        assert_eq!(release.id_like, vec!["rhel", "centos", "fedora"]);
        assert_eq!(release.family(), Some(DistroFamily::Redhat));
    }

    #[test]
    fn test_unrecognized_distro() {
        let release = OsRelease::parse("ID=nixos\n");
        assert_eq!(release.family(), None);
        assert_eq!(OsRelease::parse("").family(), None);
    }

    #[test]
    fn test_family_from_str_round_trip() {
        for family in DistroFamily::ALL {
            assert_eq!(family.as_str().parse::<DistroFamily>(), Ok(family));
        }
        assert!("windows".parse::<DistroFamily>().is_err());
    }
}
