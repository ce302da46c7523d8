use std::fmt;

/// Per-language package ecosystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageEcosystem {
    Pip,
    Cargo,
    Go,
    Gem,
}

impl LanguageEcosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pip => "pip",
            Self::Cargo => "cargo",
            Self::Go => "go",
            Self::Gem => "gem",
        }
    }
}

/// Distribution-independent sandboxed packagers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniversalEcosystem {
    Snap,
    Flatpak,
}

impl UniversalEcosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snap => "snap",
            Self::Flatpak => "flatpak",
        }
    }
}

/// One way of obtaining a tool. A tool lists these in decreasing preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodSpec {
    /// Distribution package, by generic name.
    NativePackage(&'static str),
    LanguagePackage {
        ecosystem: LanguageEcosystem,
        name: &'static str,
    },
    UniversalPackage {
        ecosystem: UniversalEcosystem,
        id: &'static str,
    },
    /// Clone `url` and run `build` through `sh -c` inside the checkout.
    SourceBuild {
        url: &'static str,
        build: &'static str,
    },
    /// Latest release asset of `repo` (`owner/name`) whose file name starts
    /// with `asset`.
    GitHubRelease {
        repo: &'static str,
        asset: &'static str,
    },
    /// Python project run from a private checkout with its own venv.
    SourceInterpreted { repo: &'static str },
}

/// The nine install strategies, used for grouping and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Native,
    Pip,
    Cargo,
    Go,
    Gem,
    Universal,
    GitHubRelease,
    SourceBuild,
    Interpreted,
}

impl MethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Pip => "pip",
            Self::Cargo => "cargo",
            Self::Go => "go",
            Self::Gem => "gem",
            Self::Universal => "universal",
            Self::GitHubRelease => "github",
            Self::SourceBuild => "source",
            Self::Interpreted => "interpreted",
        }
    }
}

impl MethodSpec {
    pub const fn pip(name: &'static str) -> Self {
        Self::LanguagePackage {
            ecosystem: LanguageEcosystem::Pip,
            name,
        }
    }

    pub const fn cargo(name: &'static str) -> Self {
        Self::LanguagePackage {
            ecosystem: LanguageEcosystem::Cargo,
            name,
        }
    }

    pub const fn go(name: &'static str) -> Self {
        Self::LanguagePackage {
            ecosystem: LanguageEcosystem::Go,
            name,
        }
    }

    pub const fn gem(name: &'static str) -> Self {
        Self::LanguagePackage {
            ecosystem: LanguageEcosystem::Gem,
            name,
        }
    }

    pub const fn snap(id: &'static str) -> Self {
        Self::UniversalPackage {
            ecosystem: UniversalEcosystem::Snap,
            id,
        }
    }

    pub const fn flatpak(id: &'static str) -> Self {
        Self::UniversalPackage {
            ecosystem: UniversalEcosystem::Flatpak,
            id,
        }
    }

    pub const fn github(repo: &'static str, asset: &'static str) -> Self {
        Self::GitHubRelease { repo, asset }
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            Self::NativePackage(_) => MethodKind::Native,
            Self::LanguagePackage { ecosystem, .. } => match ecosystem {
                LanguageEcosystem::Pip => MethodKind::Pip,
                LanguageEcosystem::Cargo => MethodKind::Cargo,
                LanguageEcosystem::Go => MethodKind::Go,
                LanguageEcosystem::Gem => MethodKind::Gem,
            },
            Self::UniversalPackage { .. } => MethodKind::Universal,
            Self::GitHubRelease { .. } => MethodKind::GitHubRelease,
            Self::SourceBuild { .. } => MethodKind::SourceBuild,
            Self::SourceInterpreted { .. } => MethodKind::Interpreted,
        }
    }

    /// Short label such as `native` or `snap`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LanguagePackage { ecosystem, .. } => ecosystem.as_str(),
            Self::UniversalPackage { ecosystem, .. } => ecosystem.as_str(),
            other => other.kind().as_str(),
        }
    }
}

impl fmt::Display for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NativePackage(name) => write!(f, "native:{name}"),
            Self::LanguagePackage { ecosystem, name } => write!(f, "{}:{name}", ecosystem.as_str()),
            Self::UniversalPackage { ecosystem, id } => write!(f, "{}:{id}", ecosystem.as_str()),
            Self::SourceBuild { url, .. } => write!(f, "source:{url}"),
            Self::GitHubRelease { repo, asset } => write!(f, "github:{repo}#{asset}"),
            Self::SourceInterpreted { repo } => write!(f, "interpreted:{repo}"),
        }
    }
}
