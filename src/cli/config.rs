//! Config subcommand implementation.
//!
//! Handles the `netsweep config` command for managing the settings file.

use crate::config::{Paths, ScannerSettings};
use crate::error::{CliError, CliResult};
use crate::output;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Manage the settings file.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Settings file actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective settings as JSON
    Show,

    /// Write a settings file populated with defaults
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the settings file location
    Path,
}

impl ConfigCommand {
    /// Execute the config command.
    pub fn execute(&self, config: Option<&Path>, quiet: bool) -> CliResult<()> {
        match &self.action {
            ConfigAction::Show => {
                let settings = ScannerSettings::load(config)?;
                let json = serde_json::to_string_pretty(&settings)
                    .map_err(|e| CliError::Other(e.to_string()))?;
                println!("{}", json);
                Ok(())
            }
            ConfigAction::Init { force } => {
                let path = settings_path(config)?;
                init_settings(&path, *force)?;
                if !quiet {
                    output::print_success(&format!("Wrote default settings to {}", path.display()));
                }
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", settings_path(config)?.display());
                Ok(())
            }
        }
    }
}

fn settings_path(config: Option<&Path>) -> CliResult<PathBuf> {
    match config {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Paths::discover()?.settings_file()),
    }
}

fn init_settings(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::Other(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    ScannerSettings::default().save_to(path)?;
    Ok(())
}
