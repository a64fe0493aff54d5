//! Read-only verification reports for a static website patched by `sitefix`.

mod cache;
mod cli;
mod css;
mod fonts;
mod images;
mod report;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use sitefix::exit_codes;
use sitefix::io::config::{config_path, load_config};

use crate::cli::Audit;

#[derive(Parser)]
#[command(name = "siteaudit", version, about = "Verification reports for a static website")]
struct Cli {
    /// Site root holding the HTML pages.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to `<root>/sitefix.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit the structured result as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render-blocking stylesheets per page.
    Css,
    /// `font-display` coverage in stylesheets and Google Fonts links.
    Fonts,
    /// `.htaccess` cache directives and cacheable assets.
    Cache,
    /// Re-encoded image outputs, references and savings.
    Images,
    /// Every report in sequence.
    All,
}

impl From<Command> for Audit {
    fn from(command: Command) -> Self {
        match command {
            Command::Css => Audit::Css,
            Command::Fonts => Audit::Fonts,
            Command::Cache => Audit::Cache,
            Command::Images => Audit::Images,
            Command::All => Audit::All,
        }
    }
}

fn main() {
    sitefix::logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if !cli.root.is_dir() {
        bail!("site root {} is not a directory", cli.root.display());
    }
    let cfg = load_config(&config_path(&cli.root, cli.config.as_deref()))?;
    let out = cli::run_audit(&cli.root, &cfg, cli.command.into(), cli.json)?;
    print!("{out}");
    Ok(())
}
