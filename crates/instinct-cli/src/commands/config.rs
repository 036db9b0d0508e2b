//! `instinct config`

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use instinct_core::config::CONFIG_ENV;
use instinct_core::InstinctConfig;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show config file paths checked
    #[arg(long)]
    pub paths: bool,
}

pub fn execute(args: &ConfigArgs, config: &InstinctConfig, config_override: Option<&Path>) -> Result<()> {
    if args.paths {
        println!("{}", "Configuration discovery paths:".bold());
        match config_override {
            Some(path) => println!("  1. --config / {}: {}", CONFIG_ENV, path.display()),
            None => println!("  1. --config / {}: {}", CONFIG_ENV, "(not set)".dimmed()),
        }
        match InstinctConfig::default_path() {
            Some(path) => println!("  2. {}", path.display()),
            None => println!("  2. {}", "(no config directory)".dimmed()),
        }
        println!();
        println!("{}", "Store roots:".bold());
        println!("  personal:  {}", config.personal_dir().display());
        println!("  inherited: {}", config.inherited_dir().display());
        println!();
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
