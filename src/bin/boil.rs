// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use boil::command::{self, Context};

use anyhow::Result;
use clap::{error::ErrorKind, Parser, Subcommand};
use std::process::exit;
use tracing::{error, Level};
use tracing_subscriber::{
    fmt::{self, writer::MakeWriterExt},
    prelude::*,
    EnvFilter,
};

const SETTINGS_EXAMPLE: &str = r#"Settings are read from ~/.boil.json, e.g.:

  {
    "boilerplate_repo": "git@github.com:acme/boilerplate.git",
    "boilerplate_branch": "master",
    "default_update_strategy": "merge"
  }"#;

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    after_help = SETTINGS_EXAMPLE,
    override_usage = "boil <command> [args]...",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let ctx = Context::from_env();
        match self.command {
            Command::New(opts) => command::new::run(&ctx, &opts.args)?,
            Command::Link(opts) => command::link::run(&ctx, &opts.args)?,
            Command::Update(opts) => command::update::run(&ctx, &opts.args)?,
            Command::Status(_) => command::status::run(&ctx)?,
            Command::Diff(opts) => command::diff::run(&ctx, &opts.args)?,
            Command::Lock(opts) => command::lock::run(&ctx, &opts.args)?,
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Create new project from boilerplate.
    #[command(
        override_usage = "boil new <project-name> --origin=<git-url> [--boilerplate=<git-url>] [--branch=<name>]"
    )]
    New(RawArgs),

    /// Link current project to boilerplate.
    #[command(override_usage = "boil link [--boilerplate=<git-url>]")]
    Link(RawArgs),

    /// Pull boilerplate updates into current project.
    #[command(override_usage = "boil update [--strategy=merge|rebase] [--ref=<branch-or-tag>]")]
    Update(RawArgs),

    /// Show how current project relates to boilerplate.
    #[command(override_usage = "boil status")]
    Status(RawArgs),

    /// List files that differ from boilerplate.
    #[command(override_usage = "boil diff [--ref=<branch-or-tag>]")]
    Diff(RawArgs),

    /// Keep local version of paths on every update.
    #[command(override_usage = "boil lock <path>...")]
    Lock(RawArgs),
}

/// Arguments handed to command handler as is.
#[derive(Parser, Clone, Debug)]
struct RawArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "args")]
    pub args: Vec<String>,
}

fn main() {
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(writer);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // INVARIANT: Only help and version requests count as success.
            let code = match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            if let Err(print_error) = error.print() {
                eprintln!("{print_error}");
            }
            exit(code);
        }
    };

    if let Err(error) = cli.run() {
        error!("{error:#}");
        exit(1);
    }

    exit(0)
}
