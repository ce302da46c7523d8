//! Distribution-specific package names.
//!
//! Tools and prerequisites are declared under one generic package name. Some
//! families ship them under another name; those cases are listed here, and
//! everything else resolves to the generic name unchanged.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::common::distro::DistroFamily;
use DistroFamily::*;

/// One override: every family in `families` installs `generic` as `actual`.
struct Override {
    families: &'static [DistroFamily],
    generic: &'static str,
    actual: &'static str,
}

const fn ov(
    families: &'static [DistroFamily],
    generic: &'static str,
    actual: &'static str,
) -> Override {
    Override {
        families,
        generic,
        actual,
    }
}

static OVERRIDES: &[Override] = &[
    ov(&[Debian, Suse, Alpine], "netcat", "netcat-openbsd"),
    ov(&[Arch], "netcat", "openbsd-netcat"),
    ov(&[Redhat], "netcat", "nmap-ncat"),
    ov(&[Gentoo], "netcat", "net-analyzer/openbsd-netcat"),
    ov(&[Arch, Redhat], "tshark", "wireshark-cli"),
    ov(&[Suse], "tshark", "wireshark"),
    ov(&[Arch], "python3-pip", "python-pip"),
    ov(&[Alpine], "python3-pip", "py3-pip"),
    ov(&[Arch], "python3-venv", "python"),
    ov(&[Redhat, Suse, Void], "python3-venv", "python3"),
    ov(&[Alpine], "python3-venv", "python3"),
    ov(&[Arch], "python3", "python"),
    ov(&[Debian], "golang", "golang-go"),
    ov(&[Arch, Alpine, Suse, Void], "golang", "go"),
    ov(&[Gentoo], "golang", "dev-lang/go"),
    ov(&[Arch], "cargo", "rust"),
    ov(&[Debian], "ruby", "ruby-full"),
    ov(&[Arch], "build-essential", "base-devel"),
    ov(&[Redhat, Suse], "build-essential", "gcc-c++"),
    ov(&[Alpine], "build-essential", "build-base"),
    ov(&[Void], "build-essential", "base-devel"),
    ov(&[Gentoo], "build-essential", "sys-devel/gcc"),
    ov(&[Redhat, Suse], "libpcap-dev", "libpcap-devel"),
    ov(&[Arch, Void], "libpcap-dev", "libpcap"),
    ov(&[Redhat, Suse], "libssl-dev", "openssl-devel"),
    ov(&[Arch], "libssl-dev", "openssl"),
    ov(&[Alpine], "libssl-dev", "openssl-dev"),
    ov(&[Void], "libssl-dev", "openssl-devel"),
    ov(&[Redhat, Suse], "dnsutils", "bind-utils"),
    ov(&[Arch], "dnsutils", "bind"),
    ov(&[Alpine], "dnsutils", "bind-tools"),
    ov(&[Arch, Redhat, Suse, Alpine, Void], "proxychains4", "proxychains-ng"),
    ov(&[Arch], "metasploit-framework", "metasploit"),
    ov(&[Gentoo], "aircrack-ng", "net-wireless/aircrack-ng"),
    ov(&[Gentoo], "nmap", "net-analyzer/nmap"),
    ov(&[Gentoo], "hashcat", "app-crypt/hashcat"),
    ov(&[Gentoo], "john", "app-crypt/johntheripper"),
];

lazy_static! {
    /// generic name -> family -> actual name
    static ref TABLE: HashMap<&'static str, HashMap<DistroFamily, &'static str>> = {
        let mut table: HashMap<&'static str, HashMap<DistroFamily, &'static str>> =
            HashMap::new();
        for entry in OVERRIDES {
            let per_family = table.entry(entry.generic).or_default();
            for family in entry.families {
                per_family.insert(*family, entry.actual);
            }
        }
        table
    };
}

/// Map a generic package name to the name `family` uses.
pub fn resolve(family: DistroFamily, generic: &str) -> &str {
    TABLE
        .get(generic)
        .and_then(|per_family| per_family.get(&family))
        .copied()
        .unwrap_or(generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_netcat_differs_per_family() {
        assert_eq!(resolve(Debian, "netcat"), "netcat-openbsd");
        assert_eq!(resolve(Arch, "netcat"), "openbsd-netcat");
        assert_ne!(resolve(Debian, "netcat"), resolve(Arch, "netcat"));
    }

    #[test]
    fn test_shared_override_across_families() {
        assert_eq!(resolve(Debian, "netcat"), resolve(Alpine, "netcat"));
        assert_eq!(resolve(Arch, "golang"), "go");
        assert_eq!(resolve(Alpine, "golang"), "go");
    }

    #[test]
    fn test_unmapped_name_is_unchanged() {
        for family in DistroFamily::ALL {
            assert_eq!(
                resolve(family, "totally-unmapped-name"),
                "totally-unmapped-name"
            );
        }
    }

    #[test]
    fn test_unknown_family_never_overrides() {
        assert_eq!(resolve(Unknown, "netcat"), "netcat");
        assert_eq!(resolve(Unknown, "nmap"), "nmap");
    }

    #[test]
    fn test_plain_name_on_debian() {
        assert_eq!(resolve(Debian, "nmap"), "nmap");
    }

    #[test]
    fn test_no_duplicate_keys() {
        let mut seen = std::collections::HashSet::new();
        for entry in OVERRIDES {
            for family in entry.families {
                assert!(
                    seen.insert((*family, entry.generic)),
                    "duplicate override for ({family}, {})",
                    entry.generic
                );
            }
        }
    }
}
