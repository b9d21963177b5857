//! `springforge config`: inspect the effective configuration.

use serde_json::Value;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            if output.is_json() {
                output.json(&value)?;
            } else {
                output.data(&display_value(&value))?;
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&as_json(&config)?)?;
            } else {
                let serialised =
                    toml::to_string_pretty(&config).map_err(|e| CliError::Config {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.data(serialised.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            output.data(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn as_json(config: &AppConfig) -> CliResult<Value> {
    serde_json::to_value(config).map_err(|e| CliError::Config {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Look up a dotted key such as `defaults.build_tool`.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<Value> {
    let root = as_json(config)?;
    key.split('.')
        .try_fold(&root, |node, part| node.get(part))
        .cloned()
        .ok_or_else(|| CliError::UnknownConfigKey { key: key.to_string() })
}

/// Strings print bare; unset values print empty; everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "defaults.group_id").unwrap();
        assert_eq!(display_value(&value), "com.example");
    }

    #[test]
    fn enums_use_their_serialized_names() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "defaults.build_tool").unwrap();
        assert_eq!(display_value(&value), "maven");
    }

    #[test]
    fn sections_are_returned_whole() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "logging").unwrap();
        assert_eq!(value["file"], false);
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "defaults.colour"),
            Err(CliError::UnknownConfigKey { .. })
        ));
    }

    #[test]
    fn unset_values_print_empty() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "templates.local_path").unwrap();
        assert_eq!(display_value(&value), "");
    }
}
