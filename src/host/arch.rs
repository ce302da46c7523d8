/// The same CPU family spelled the three ways download sources use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchSpellings {
    /// Native package style (`amd64`, `arm64`, `armhf`).
    pub package: String,
    /// Generic release tarball style (`x86_64`, `aarch64`, `armv7`).
    pub generic: String,
    /// Go toolchain style (`amd64`, `arm64`, `arm`).
    pub go: String,
}

impl ArchSpellings {
    /// Normalize a machine name (`uname -m` or Rust target arch).
    pub fn from_machine(machine: &str) -> Self {
        let machine = machine.trim().to_ascii_lowercase();
        let (package, generic, go) = match machine.as_str() {
            "x86_64" | "amd64" | "x64" => ("amd64", "x86_64", "amd64"),
            "aarch64" | "arm64" | "armv8" | "armv8l" => ("arm64", "aarch64", "arm64"),
            "arm" | "armv7" | "armv7l" | "armhf" => ("armhf", "armv7", "arm"),
            "x86" | "i386" | "i486" | "i586" | "i686" => ("i386", "i686", "386"),
            "powerpc64" | "ppc64le" => ("ppc64el", "ppc64le", "ppc64le"),
            other => return Self::uniform(other),
        };
        Self {
            package: package.to_string(),
            generic: generic.to_string(),
            go: go.to_string(),
        }
    }

    fn uniform(name: &str) -> Self {
        Self {
            package: name.to_string(),
            generic: name.to_string(),
            go: name.to_string(),
        }
    }

    /// package, generic, go; duplicates removed keeping the first.
    pub fn distinct(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(3);
        for spelling in [&self.package, &self.generic, &self.go] {
            if !out.contains(&spelling.as_str()) {
                out.push(spelling.as_str());
            }
        }
        out
    }
}

impl std::fmt::Display for ArchSpellings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.package, self.generic, self.go)
    }
}
