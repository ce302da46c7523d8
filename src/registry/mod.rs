//! Static catalog of the tools armory knows how to obtain.
//!
//! Every tool is one [`ToolSpec`] entry in [`catalog::TOOLS`]; adding a tool
//! means adding an entry there. [`REGISTRY`] indexes the catalog once at
//! startup and is read-only afterwards.

mod catalog;
pub mod method;

pub use method::{LanguageEcosystem, MethodSpec, UniversalEcosystem};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Wireless,
    Cracking,
    Scanning,
    Web,
    Recon,
    Exploitation,
    Utility,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Wireless,
        Self::Cracking,
        Self::Scanning,
        Self::Web,
        Self::Recon,
        Self::Exploitation,
        Self::Utility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wireless => "wireless",
            Self::Cracking => "cracking",
            Self::Scanning => "scanning",
            Self::Web => "web",
            Self::Recon => "recon",
            Self::Exploitation => "exploitation",
            Self::Utility => "utility",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Wireless => "Wireless",
            Self::Cracking => "Password Cracking",
            Self::Scanning => "Network Scanning",
            Self::Web => "Web Application",
            Self::Recon => "Reconnaissance",
            Self::Exploitation => "Exploitation",
            Self::Utility => "Utilities",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// A tool and the ordered ways of obtaining it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    /// Registry key.
    pub name: &'static str,
    pub category: Category,
    /// Executable whose presence means the tool is installed.
    pub binary: &'static str,
    pub description: &'static str,
    /// Argument that prints a version without side effects, if the tool has one.
    pub version_arg: Option<&'static str>,
    /// Decreasing preference; never empty.
    pub methods: &'static [MethodSpec],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool '{0}' is registered more than once")]
    DuplicateName(&'static str),
    #[error("tool '{0}' has no install methods")]
    NoMethods(&'static str),
}

/// Read-only tool catalog with name and category lookup.
#[derive(Debug)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Index `tools`, rejecting duplicate names and empty method lists.
    pub fn new(tools: &[ToolSpec]) -> Result<Self, RegistryError> {
        let mut by_name = HashMap::with_capacity(tools.len());
        for (index, tool) in tools.iter().enumerate() {
            if tool.methods.is_empty() {
                return Err(RegistryError::NoMethods(tool.name));
            }
            if by_name.insert(tool.name, index).is_some() {
                return Err(RegistryError::DuplicateName(tool.name));
            }
        }
        Ok(Self {
            tools: tools.to_vec(),
            by_name,
        })
    }

    /// The built-in catalog.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(catalog::TOOLS)
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    /// All tools in catalog order.
    pub fn all(&self) -> &[ToolSpec] {
        &self.tools
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter().filter(move |t| t.category == category)
    }

    /// Case-insensitive substring match on tool names.
    pub fn search(&self, query: &str) -> Vec<&ToolSpec> {
        let query = query.to_lowercase();
        self.tools
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Categories that have at least one tool, in display order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.tools.iter().any(|t| t.category == *c))
            .collect()
    }
}

lazy_static! {
    /// Process-wide registry, built from the catalog on first use.
    pub static ref REGISTRY: Result<ToolRegistry, RegistryError> = ToolRegistry::builtin();
}

/// The process-wide registry.
pub fn registry() -> anyhow::Result<&'static ToolRegistry> {
    REGISTRY
        .as_ref()
        .map_err(|e| anyhow::anyhow!("invalid tool catalog: {e}"))
}
