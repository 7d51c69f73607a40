//! `xref config` command - Configuration inspection
//!
//! Shows the effective configuration and the files it was read from.

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::emit;
use crate::cli::{Context, GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show paths to configuration files
    Path,
}

#[derive(Debug, Serialize)]
struct ConfigPaths {
    global: Option<PathBuf>,
    global_exists: bool,
    project: Option<PathBuf>,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global);
    match cmd {
        ConfigCommands::Show => {
            let format = match ctx.format {
                OutputFormat::Json => OutputFormat::Json,
                _ => OutputFormat::Yaml,
            };
            emit(&ctx.config, None, format)
        }
        ConfigCommands::Path => run_path(&ctx),
    }
}

fn run_path(ctx: &Context) -> Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let global = Config::global_config_path();
    let paths = ConfigPaths {
        global_exists: global.as_ref().is_some_and(|p| p.exists()),
        global,
        project: Config::project_config_path(&cwd),
    };

    if matches!(ctx.format, OutputFormat::Json | OutputFormat::Yaml) {
        return emit(&paths, None, ctx.format);
    }

    let show = |label: &str, path: Option<&PathBuf>, exists: bool| match path {
        Some(p) if exists => println!("{:8} {}", label, p.display()),
        Some(p) => println!("{:8} {} {}", label, p.display(), style("(not found)").dim()),
        None => println!("{:8} {}", label, style("(none)").dim()),
    };
    show("global", paths.global.as_ref(), paths.global_exists);
    show("project", paths.project.as_ref(), paths.project.is_some());
    Ok(())
}
