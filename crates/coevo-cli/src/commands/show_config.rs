//! Print the effective configuration.

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::Config;

pub fn run(config: Option<PathBuf>) -> Result<()> {
    let (config, source) = Config::load(config.as_deref())?;
    match source {
        Some(path) => println!("{} {}", "#".dimmed(), path.display().to_string().dimmed()),
        None => println!("{}", "# built-in defaults".dimmed()),
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
