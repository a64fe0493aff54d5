//! Idempotent maintenance patches for a static website.
//!
//! Each subcommand patches the HTML/CSS files under `--root` in place and
//! prints a report. Running a command twice changes nothing the second time.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use sitefix::defer_css::apply_defer_css;
use sitefix::exit_codes;
use sitefix::fonts::apply_font_display;
use sitefix::images::optimize_images;
use sitefix::io::config::{SiteConfig, config_path, load_config, write_config};
use sitefix::render;
use sitefix::security::apply_security;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "sitefix",
    version,
    about = "Idempotent maintenance patches for a static website"
)]
struct Cli {
    /// Site root holding the HTML pages.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to `<root>/sitefix.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inject security meta headers and the security script into every page.
    Security,
    /// Add `font-display` to `@font-face` rules and Google Fonts links.
    Fonts,
    /// Turn configured render-blocking stylesheets into preloads.
    DeferCss,
    /// Re-encode the configured images.
    Images,
    /// Write the default `sitefix.toml` if missing.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
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
    let cfg_path = config_path(&cli.root, cli.config.as_deref());
    let load = || -> Result<SiteConfig> {
        let cfg = load_config(&cfg_path)?;
        debug!(root = %cli.root.display(), config = %cfg_path.display(), "config loaded");
        Ok(cfg)
    };

    let report = match cli.command {
        Command::InitConfig { force } => return cmd_init_config(&cfg_path, force),
        Command::Security => {
            let cfg = load()?;
            let summary = apply_security(&cli.root, &cfg.security)?;
            render::render_security(&summary, &cfg.security)
        }
        Command::Fonts => render::render_fonts(&apply_font_display(&cli.root, &load()?.fonts)?),
        Command::DeferCss => render::render_defer(&apply_defer_css(&cli.root, &load()?.css)?),
        Command::Images => render::render_images(&optimize_images(&cli.root, &load()?.images)),
    };
    print!("{report}");
    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("config already present: {}", path.display());
        return Ok(());
    }
    write_config(path, &SiteConfig::default())?;
    println!("wrote {}", path.display());
    Ok(())
}
