mod cli;
mod common;
mod install;
mod host;
mod registry;
mod report;
mod ui;

use clap::Parser;
use std::io::IsTerminal;

use crate::cli::{Cli, CliError};
use crate::common::config::ArmoryConfig;
use crate::ui::prelude::*;

const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    let cli = Cli::parse();

    let color = std::io::stdout().is_terminal();
    if !color {
        colored::control::set_override(false);
    }
    ui::init(cli.output, color);
    ui::set_debug_mode(cli.debug);

    let mut config = match ArmoryConfig::load() {
        Ok(config) => config,
        Err(err) => {
            emit(
                Level::Warn,
                "config.invalid",
                &format!("{} Ignoring config: {err:#}", char::from(NerdFont::Warning)),
                None,
            );
            ArmoryConfig::default()
        }
    };
    if cli.debug {
        config.diagnostics = true;
    }

    install::context::install_interrupt_handler();

    if let Err(err) = cli::run(cli, config) {
        let code = if err.downcast_ref::<CliError>().is_some() {
            EXIT_USAGE
        } else {
            EXIT_FAILURE
        };
        emit(
            Level::Error,
            "armory.error",
            &format!("{} {err:#}", char::from(NerdFont::Cross)),
            None,
        );
        std::process::exit(code);
    }
}
