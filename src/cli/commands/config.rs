//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the config command.
pub fn run_config(action: &ConfigAction, path: &Path, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Init => {
            if path.exists() {
                Output::warning(&format!("Config already exists at {}", path.display()));
            } else {
                Settings::default().save_to(&path.to_path_buf())?;
                Output::success(&format!("Created default config at {}", path.display()));
            }
        }

        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
