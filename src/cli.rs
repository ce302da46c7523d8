use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Select};
use std::fs;
use std::io::IsTerminal;
use thiserror::Error;

use crate::common::config::ArmoryConfig;
use crate::common::paths::InstallPaths;
use crate::install::{RunContext, Selector, install_tools, native};
use crate::host::SystemCapabilities;
use crate::registry::{Category, registry};
use crate::report::{self, Filter};
use crate::ui::prelude::*;

/// Multi-method security tool installer
#[derive(Parser, Debug)]
#[command(name = "armory", author, version, about, long_about = None)]
pub struct Cli {
    /// Show debug output and per-attempt failure reasons
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List every known tool with its install status
    List {
        /// Only show installed tools
        #[arg(long, conflicts_with = "missing")]
        installed: bool,
        /// Only show missing tools
        #[arg(long)]
        missing: bool,
    },
    /// Install a single tool
    Install {
        /// Tool name as shown by `list`
        tool: String,
    },
    /// Install every known tool
    InstallAll,
    /// Install every tool of a category (pick one interactively if omitted)
    InstallCategory {
        category: Option<String>,
    },
    /// List the tools of one category
    Category {
        name: String,
    },
    /// Show what this system offers for installing tools
    Prerequisites {
        /// Install the base toolchains through the system package manager
        #[arg(long)]
        install: bool,
    },
    /// Search tools by name
    Search {
        query: String,
    },
    /// Show a tool's status and install methods
    Info {
        tool: String,
    },
    /// Remove everything armory installed into its private directories
    Clean,
}

/// Mistakes in the invocation itself, as opposed to failed installs.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown tool '{0}' (try `armory search`)")]
    UnknownTool(String),
    #[error("unknown category '{0}' (one of: {list})", list = Category::ALL.map(|c| c.as_str()).join(", "))]
    UnknownCategory(String),
    #[error("no category given and no terminal to pick one (one of: {list})", list = Category::ALL.map(|c| c.as_str()).join(", "))]
    MissingCategory,
}

fn parse_category(name: &str) -> Result<Category, CliError> {
    name.parse()
        .map_err(|_| CliError::UnknownCategory(name.to_string()))
}

pub fn run(cli: Cli, mut config: ArmoryConfig) -> Result<()> {
    if cli.yes {
        config.assume_yes = true;
    }
    let registry = registry()?;

    match cli.command {
        Commands::List { installed, missing } => {
            let paths = InstallPaths::discover()?;
            report::print_list(registry, &paths, None, Filter::from_flags(installed, missing));
        }
        Commands::Category { name } => {
            let category = parse_category(&name)?;
            let paths = InstallPaths::discover()?;
            report::print_list(registry, &paths, Some(category), Filter::All);
        }
        Commands::Search { query } => {
            let paths = InstallPaths::discover()?;
            report::print_search(registry, &paths, &query);
        }
        Commands::Info { tool } => {
            let spec = registry
                .get(&tool)
                .ok_or_else(|| CliError::UnknownTool(tool.clone()))?;
            let paths = InstallPaths::discover()?;
            report::print_info(spec, &SystemCapabilities::detect(), &paths);
        }
        Commands::Install { tool } => {
            if registry.get(&tool).is_none() {
                return Err(CliError::UnknownTool(tool).into());
            }
            install(config, Selector::Tool(&tool))?;
        }
        Commands::InstallAll => install(config, Selector::All)?,
        Commands::InstallCategory { category } => {
            let category = match category {
                Some(name) => parse_category(&name)?,
                None => match pick_category()? {
                    Some(category) => category,
                    None => return Ok(()),
                },
            };
            install(config, Selector::Category(category))?;
        }
        Commands::Prerequisites { install } => prerequisites(config, install)?,
        Commands::Clean => clean(&config)?,
    }
    Ok(())
}

fn install(config: ArmoryConfig, selector: Selector<'_>) -> Result<()> {
    let registry = registry()?;
    let mut ctx = RunContext::new(config)?;
    let diagnostics = ctx.diagnostics();
    let summary = install_tools(&mut ctx, registry, selector, diagnostics)?;
    report::print_summary(&summary);
    Ok(())
}

fn pick_category() -> Result<Option<Category>> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::MissingCategory.into());
    }
    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.title()).collect();
    let selection = Select::new()
        .with_prompt("Install which category?")
        .items(&labels)
        .default(0)
        .interact_opt()
        .context("Failed to show category picker")?;
    Ok(selection.map(|idx| Category::ALL[idx]))
}

fn prerequisites(config: ArmoryConfig, install: bool) -> Result<()> {
    if !install {
        let paths = InstallPaths::discover()?;
        report::print_prerequisites(&SystemCapabilities::detect(), &paths);
        return Ok(());
    }

    let mut ctx = RunContext::new(config)?;
    if ctx.caps.native_manager().is_none() {
        emit(
            Level::Warn,
            "prerequisites.no_manager",
            &format!(
                "{} No supported package manager found; install git, curl, python3 and a C toolchain manually",
                char::from(NerdFont::Warning)
            ),
            None,
        );
        return Ok(());
    }

    match native::install_packages(&mut ctx, native::BASE_PREREQUISITES) {
        Ok(()) => emit(
            Level::Success,
            "prerequisites.installed",
            &format!("{} Base prerequisites installed", char::from(NerdFont::Check)),
            None,
        ),
        Err(err) => emit(
            Level::Error,
            "prerequisites.failed",
            &format!("{} Installing prerequisites failed: {}", char::from(NerdFont::Cross), err.reason()),
            None,
        ),
    }
    report::print_prerequisites(&SystemCapabilities::detect(), &ctx.paths);
    Ok(())
}

fn clean(config: &ArmoryConfig) -> Result<()> {
    let paths = InstallPaths::discover()?;
    let targets: Vec<_> = [&paths.bin_dir, &paths.opt_dir]
        .into_iter()
        .filter(|dir| dir.exists())
        .collect();

    if targets.is_empty() {
        emit(
            Level::Info,
            "clean.nothing",
            "Nothing to clean",
            None,
        );
        return Ok(());
    }

    if !config.assume_yes {
        println!("{}", "This removes:".bold());
        for dir in &targets {
            println!("  {}", dir.display());
        }
        let confirmed = Confirm::new()
            .with_prompt("Remove everything armory installed there?")
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    for dir in targets {
        fs::remove_dir_all(dir).with_context(|| format!("removing {}", dir.display()))?;
        emit(
            Level::Success,
            "clean.removed",
            &format!("{} Removed {}", char::from(NerdFont::Trash), dir.display()),
            Some(serde_json::json!({ "path": dir })),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::try_parse_from(["armory", "list", "--missing"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List {
                installed: false,
                missing: true
            }
        ));
        assert!(Cli::try_parse_from(["armory", "list", "--installed", "--missing"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["armory", "install", "nmap", "--yes", "--output", "json"])
            .unwrap();
        assert!(cli.yes);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Install { ref tool } if tool == "nmap"));
    }

    #[test]
    fn test_install_category_argument_is_optional() {
        let cli = Cli::try_parse_from(["armory", "install-category"]).unwrap();
        assert!(matches!(cli.command, Commands::InstallCategory { category: None }));
    }

    #[test]
    fn test_missing_argument_is_rejected() {
        assert!(Cli::try_parse_from(["armory", "install"]).is_err());
        assert!(Cli::try_parse_from(["armory", "search"]).is_err());
    }

    #[test]
    fn test_unknown_category_lists_choices() {
        let err = parse_category("nope").unwrap_err();
        assert!(err.to_string().contains("wireless"));
        assert_eq!(parse_category("Web").unwrap(), Category::Web);
    }

    #[test]
    fn test_missing_category_names_choices() {
        let message = CliError::MissingCategory.to_string();
        assert!(message.contains("no terminal"));
        assert!(message.contains("wireless, "));
    }
}
