//! Config command implementation.

use serde_json::json;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::CcfError;
use crate::output::to_json;

/// Execute config subcommands
///
/// # Errors
///
/// Returns an error if the config cannot be serialized or written.
pub fn config(
    cmd: &ConfigCommands,
    paths: &Paths,
    config: &Config,
    format: OutputFormat,
) -> Result<String, CcfError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Json => to_json(config),
            OutputFormat::Pretty => config.to_yaml(),
        },
        ConfigCommands::Path => match format {
            OutputFormat::Json => to_json(&json!({
                "root": paths.root,
                "config_file": paths.config_file,
                "database": paths.database,
                "log_file": paths.log_file,
            })),
            OutputFormat::Pretty => Ok(paths.config_file.display().to_string()),
        },
        ConfigCommands::Init { force } => {
            if paths.config_file.exists() && !force {
                return Err(CcfError::InvalidInput(format!(
                    "{} already exists. Use --force to overwrite",
                    paths.config_file.display()
                )));
            }
            paths.ensure_dirs()?;
            Config::default().save_to_path(&paths.config_file)?;
            Ok(format!("Wrote {}", paths.config_file.display()))
        }
    }
}
