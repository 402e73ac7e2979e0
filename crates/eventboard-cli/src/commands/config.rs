//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(args: ConfigArgs, config: &Config, path: &Path, formatter: &Formatter) -> Result<String> {
    match args.action {
        ConfigAction::Show => toml::to_string_pretty(config)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e))),
        ConfigAction::Path => Ok(path.display().to_string()),
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::InvalidInput(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            Config::default().save_to(path)?;
            Ok(formatter.success(&format!("Wrote default config to {}", path.display())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);
        let init = |force| ConfigArgs {
            action: ConfigAction::Init { force },
        };

        execute_config(init(false), &Config::default(), &path, &formatter).unwrap();
        assert!(path.exists());

        let again = execute_config(init(false), &Config::default(), &path, &formatter);
        assert!(matches!(again, Err(CliError::InvalidInput(_))));

        execute_config(init(true), &Config::default(), &path, &formatter).unwrap();
    }

    #[test]
    fn test_show() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let args = ConfigArgs {
            action: ConfigAction::Show,
        };
        let output = execute_config(args, &Config::default(), Path::new("unused"), &formatter).unwrap();
        assert!(output.contains("granularity = \"minute\""));
    }
}
