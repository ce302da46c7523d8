//! Read-only views over the registry and the host: list, search, info,
//! prerequisites and the post-install summary.

mod version;

use colored::*;
use serde_json::json;
use std::path::PathBuf;

use crate::common::package::overrides;
use crate::common::paths::InstallPaths;
use crate::install::executor::applicable;
use crate::install::{OutcomeKind, Summary};
use crate::host::{Ecosystem, SystemCapabilities};
use crate::registry::{Category, ToolRegistry, ToolSpec};
use crate::ui::prelude::*;

pub use version::read_version;

/// Live presence of one tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolStatus {
    pub path: Option<PathBuf>,
    pub version: Option<String>,
}

impl ToolStatus {
    /// Resolve `tool` on the private search path. The version is only read
    /// when asked for, since it spawns the tool.
    pub fn of(paths: &InstallPaths, tool: &ToolSpec, with_version: bool) -> Self {
        let path = paths.locate(tool.binary);
        let version = match (&path, tool.version_arg) {
            (Some(path), Some(arg)) if with_version => read_version(path, arg),
            _ => None,
        };
        Self { path, version }
    }

    pub fn is_installed(&self) -> bool {
        self.path.is_some()
    }
}

/// Which tools `list` shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Installed,
    Missing,
}

impl Filter {
    pub fn from_flags(installed: bool, missing: bool) -> Self {
        match (installed, missing) {
            (true, _) => Self::Installed,
            (_, true) => Self::Missing,
            _ => Self::All,
        }
    }

    fn keeps(&self, status: &ToolStatus) -> bool {
        match self {
            Self::All => true,
            Self::Installed => status.is_installed(),
            Self::Missing => !status.is_installed(),
        }
    }
}

/// Tools grouped by category in registry order, each with its status.
/// Categories left empty by the filter are dropped.
pub fn grouped<'r>(
    registry: &'r ToolRegistry,
    only: Option<Category>,
    filter: Filter,
    status: impl Fn(&ToolSpec) -> ToolStatus,
) -> Vec<(Category, Vec<(&'r ToolSpec, ToolStatus)>)> {
    registry
        .categories()
        .into_iter()
        .filter(|c| only.is_none_or(|only| only == *c))
        .filter_map(|category| {
            let rows: Vec<_> = registry
                .by_category(category)
                .map(|tool| (tool, status(tool)))
                .filter(|(_, s)| filter.keeps(s))
                .collect();
            (!rows.is_empty()).then_some((category, rows))
        })
        .collect()
}

fn status_json(tool: &ToolSpec, status: &ToolStatus) -> serde_json::Value {
    json!({
        "name": tool.name,
        "category": tool.category.as_str(),
        "binary": tool.binary,
        "description": tool.description,
        "installed": status.is_installed(),
        "path": status.path,
        "version": status.version,
    })
}

fn print_row(tool: &ToolSpec, status: &ToolStatus) {
    let (mark, name) = if status.is_installed() {
        (char::from(NerdFont::Check).to_string().green(), tool.name.green())
    } else {
        (char::from(NerdFont::Cross).to_string().red(), tool.name.normal())
    };
    let detail = match (&status.path, &status.version) {
        (Some(_), Some(version)) => version.dimmed().to_string(),
        (Some(path), None) => path.display().to_string().dimmed().to_string(),
        (None, _) => tool.description.dimmed().to_string(),
    };
    println!("  {} {: <16} {}", mark, name, detail);
}

/// `list` and `category <name>`.
pub fn print_list(
    registry: &ToolRegistry,
    paths: &InstallPaths,
    only: Option<Category>,
    filter: Filter,
) {
    let groups = grouped(registry, only, filter, |tool| ToolStatus::of(paths, tool, true));

    match get_output_format() {
        OutputFormat::Json => {
            let tools: Vec<_> = groups
                .iter()
                .flat_map(|(_, rows)| rows.iter().map(|(t, s)| status_json(t, s)))
                .collect();
            emit(
                Level::Info,
                "report.list",
                &format!("{} tools", tools.len()),
                Some(json!({ "tools": tools })),
            );
        }
        OutputFormat::Text => {
            if groups.is_empty() {
                println!("{}", "No tools match.".dimmed());
                return;
            }
            let mut installed = 0;
            let mut total = 0;
            for (category, rows) in &groups {
                println!("{}", category.title().bold());
                for (tool, status) in rows {
                    print_row(tool, status);
                    total += 1;
                    if status.is_installed() {
                        installed += 1;
                    }
                }
                println!();
            }
            println!("{}/{} installed", installed.to_string().green(), total);
        }
    }
}

/// Substring search over tool names, regardless of presence.
pub fn print_search(registry: &ToolRegistry, paths: &InstallPaths, query: &str) {
    let hits = registry.search(query);

    match get_output_format() {
        OutputFormat::Json => {
            let tools: Vec<_> = hits
                .iter()
                .map(|t| status_json(t, &ToolStatus::of(paths, t, false)))
                .collect();
            emit(
                Level::Info,
                "report.search",
                &format!("{} matches for '{}'", tools.len(), query),
                Some(json!({ "query": query, "tools": tools })),
            );
        }
        OutputFormat::Text => {
            if hits.is_empty() {
                println!("{}", format!("No tools match '{query}'.").dimmed());
                return;
            }
            println!(
                "{: <16} {: <14} {}",
                "Name".bold(),
                "Category".bold(),
                "Description".bold()
            );
            println!("{}", "-".repeat(72));
            for tool in hits {
                let name = if paths.locate(tool.binary).is_some() {
                    tool.name.green()
                } else {
                    tool.name.cyan()
                };
                println!(
                    "{: <16} {: <14} {}",
                    name,
                    tool.category.as_str(),
                    tool.description.dimmed()
                );
            }
        }
    }
}

/// `info <tool>`: status plus the method chain, marking methods this host
/// cannot run.
pub fn print_info(tool: &ToolSpec, caps: &SystemCapabilities, paths: &InstallPaths) {
    let status = ToolStatus::of(paths, tool, true);

    match get_output_format() {
        OutputFormat::Json => {
            let methods: Vec<_> = tool
                .methods
                .iter()
                .map(|m| {
                    json!({
                        "method": m.to_string(),
                        "kind": m.label(),
                        "applicable": applicable(caps, m),
                    })
                })
                .collect();
            let mut data = status_json(tool, &status);
            data["methods"] = json!(methods);
            emit(Level::Info, "report.info", tool.name, Some(data));
        }
        OutputFormat::Text => {
            println!("{} {}", tool.name.bold(), format!("({})", tool.category).dimmed());
            println!("  {}", tool.description);
            println!("  {: <10} {}", "Binary:".bold(), tool.binary);
            match &status.path {
                Some(path) => {
                    println!("  {: <10} {}", "Status:".bold(), "installed".green());
                    println!("  {: <10} {}", "Path:".bold(), path.display());
                    if let Some(version) = &status.version {
                        println!("  {: <10} {}", "Version:".bold(), version);
                    }
                }
                None => println!("  {: <10} {}", "Status:".bold(), "missing".red()),
            }
            println!();
            println!("{}", "Methods (in order):".bold());
            for (i, method) in tool.methods.iter().enumerate() {
                let line = format!("{}. {}", i + 1, method);
                if applicable(caps, method) {
                    println!("  {}", line);
                } else {
                    println!("  {} {}", line.dimmed(), "(unavailable here)".dimmed());
                }
            }
        }
    }
}

/// `prerequisites`: what host detection found.
pub fn print_prerequisites(caps: &SystemCapabilities, paths: &InstallPaths) {
    let manager = caps.native_manager();

    match get_output_format() {
        OutputFormat::Json => {
            let ecosystems: serde_json::Map<_, _> = Ecosystem::ALL
                .into_iter()
                .map(|e| (e.as_str().to_string(), json!(caps.has(e))))
                .collect();
            emit(
                Level::Info,
                "report.prerequisites",
                &format!("{} ({})", caps.distro_id, caps.family.as_str()),
                Some(json!({
                    "distro": caps.distro_id,
                    "family": caps.family.as_str(),
                    "package_manager": manager.map(|m| m.binary()),
                    "arch": caps.arch.generic,
                    "ecosystems": ecosystems,
                    "bin_dir": paths.bin_dir,
                    "opt_dir": paths.opt_dir,
                })),
            );
        }
        OutputFormat::Text => {
            println!("{}", "System:".bold());
            println!("  {: <18} {}", "Distribution", caps.distro_id.cyan());
            println!("  {: <18} {}", "Family", caps.family.as_str());
            match manager {
                Some(m) => println!("  {: <18} {}", "Package manager", m.display_name().green()),
                None => println!("  {: <18} {}", "Package manager", "none".red()),
            }
            println!("  {: <18} {}", "Architecture", caps.arch.generic);
            println!();
            println!("{}", "Ecosystems:".bold());
            for eco in Ecosystem::ALL {
                if caps.has(eco) {
                    println!("  {} {}", char::from(NerdFont::Check).to_string().green(), eco);
                } else {
                    let hint = manager
                        .map(|m| m.install_hint(overrides::resolve(caps.family, eco.package())))
                        .unwrap_or_default();
                    println!(
                        "  {} {: <10} {}",
                        char::from(NerdFont::Cross).to_string().red(),
                        eco.as_str(),
                        hint.dimmed()
                    );
                }
            }
            println!();
            println!("{}", "Install locations:".bold());
            println!("  {: <18} {}", "Binaries", paths.bin_dir.display());
            println!("  {: <18} {}", "Checkouts", paths.opt_dir.display());
        }
    }
}

/// End-of-run counts.
pub fn print_summary(summary: &Summary) {
    let exhausted: Vec<&str> = summary
        .outcomes
        .iter()
        .filter(|o| o.kind == OutcomeKind::Exhausted)
        .map(|o| o.tool)
        .collect();

    match get_output_format() {
        OutputFormat::Json => {
            let outcomes: Vec<_> = summary
                .outcomes
                .iter()
                .map(|o| {
                    let (status, method) = match &o.kind {
                        OutcomeKind::Installed(m) => ("installed", Some(m.to_string())),
                        OutcomeKind::AlreadyPresent => ("already_present", None),
                        OutcomeKind::Exhausted => ("exhausted", None),
                    };
                    json!({
                        "tool": o.tool,
                        "status": status,
                        "method": method,
                        "attempts": o.attempts.len(),
                    })
                })
                .collect();
            emit(
                Level::Info,
                "install.summary",
                "install summary",
                Some(json!({
                    "installed": summary.installed(),
                    "already_present": summary.already_present(),
                    "exhausted": summary.exhausted(),
                    "outcomes": outcomes,
                })),
            );
        }
        OutputFormat::Text => {
            separator(false);
            println!(
                "{} installed, {} already present, {} failed",
                summary.installed().to_string().green().bold(),
                summary.already_present().to_string().cyan(),
                if exhausted.is_empty() {
                    "0".normal()
                } else {
                    exhausted.len().to_string().red().bold()
                }
            );
            if !exhausted.is_empty() {
                println!("{} {}", "Failed:".red(), exhausted.join(", "));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_for<'a>(installed: &'a [&'a str]) -> impl Fn(&ToolSpec) -> ToolStatus + 'a {
        move |tool| ToolStatus {
            path: installed
                .contains(&tool.name)
                .then(|| PathBuf::from("/usr/bin").join(tool.binary)),
            version: None,
        }
    }

    #[test]
    fn test_filter_from_flags() {
        assert_eq!(Filter::from_flags(false, false), Filter::All);
        assert_eq!(Filter::from_flags(true, false), Filter::Installed);
        assert_eq!(Filter::from_flags(false, true), Filter::Missing);
    }

    #[test]
    fn test_installed_filter_keeps_only_present_tools() {
        let registry = ToolRegistry::builtin().unwrap();
        let groups = grouped(&registry, None, Filter::Installed, status_for(&["nmap", "hydra"]));

        let names: Vec<&str> = groups
            .iter()
            .flat_map(|(_, rows)| rows.iter().map(|(t, _)| t.name))
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"nmap"));
        assert!(names.contains(&"hydra"));
        // Categories with nothing installed disappear
        assert!(groups.len() <= 2);
    }

    #[test]
    fn test_missing_filter_is_the_complement() {
        let registry = ToolRegistry::builtin().unwrap();
        let missing = grouped(&registry, None, Filter::Missing, status_for(&["nmap"]));
        let count: usize = missing.iter().map(|(_, rows)| rows.len()).sum();
        assert_eq!(count, registry.all().len() - 1);
        assert!(
            missing
                .iter()
                .all(|(_, rows)| rows.iter().all(|(t, _)| t.name != "nmap"))
        );
    }

    #[test]
    fn test_single_category_view() {
        let registry = ToolRegistry::builtin().unwrap();
        let nmap_category = registry.get("nmap").unwrap().category;
        let groups = grouped(&registry, Some(nmap_category), Filter::All, status_for(&[]));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, nmap_category);
        assert!(groups[0].1.iter().any(|(t, _)| t.name == "nmap"));
    }

    #[test]
    fn test_status_resolves_private_binary() {
        let root = tempfile::tempdir().unwrap();
        let paths = InstallPaths::with_root(
            root.path().join("data"),
            root.path(),
            &std::ffi::OsString::new(),
        )
        .unwrap();
        paths.ensure().unwrap();
        let registry = ToolRegistry::builtin().unwrap();
        let nmap = registry.get("nmap").unwrap();

        assert!(!ToolStatus::of(&paths, nmap, false).is_installed());

        crate::common::shell::write_script(
            &paths.bin_dir.join(nmap.binary),
            "echo 'Nmap version 7.94SVN ( https://nmap.org )'",
        )
        .unwrap();
        let status = ToolStatus::of(&paths, nmap, true);
        assert_eq!(status.path, Some(paths.bin_dir.join("nmap")));
        assert_eq!(
            status.version.as_deref(),
            Some("Nmap version 7.94SVN ( https://nmap.org )")
        );
    }
}
