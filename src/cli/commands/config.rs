//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{MediError, MediResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const KEYS: [&str; 13] = [
    "general.verbose",
    "general.log_format",
    "origin.base_url",
    "origin.static_dir",
    "origin.timeout_secs",
    "cache.name",
    "cache.version",
    "cache.dir",
    "cache.precache",
    "cache.skip_waiting",
    "cache.runtime_prefixes",
    "content.timeout_ms",
    "content.data_root",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> MediResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let mut updated = config.clone();
            set_value(&mut updated, &key, &value)?;
            manager.save(&updated).await?;
            ui::step_ok(&UiContext::detect(), &format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> MediResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> MediResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());
    Ok(())
}

/// Apply one dotted key to a configuration
fn set_value(config: &mut Config, key: &str, value: &str) -> MediResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "verbose"] => config.general.verbose = parse_bool(value)?,
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(MediError::User(format!(
                    "Invalid log format: {}. Use text or json",
                    value
                )))
            }
        },

        ["origin", "base_url"] => config.origin.base_url = value.to_string(),
        ["origin", "static_dir"] => config.origin.static_dir = optional_path(value),
        ["origin", "timeout_secs"] => config.origin.timeout_secs = parse_u64(value)?,

        ["cache", "name"] => config.cache.name = value.to_string(),
        ["cache", "version"] => config.cache.version = value.to_string(),
        ["cache", "dir"] => config.cache.dir = optional_path(value),
        ["cache", "precache"] => config.cache.precache = parse_list(value),
        ["cache", "skip_waiting"] => config.cache.skip_waiting = parse_bool(value)?,
        ["cache", "runtime_prefixes"] => config.cache.runtime_prefixes = parse_list(value),

        ["content", "timeout_ms"] => config.content.timeout_ms = parse_u64(value)?,
        ["content", "data_root"] => config.content.data_root = value.to_string(),

        _ => {
            return Err(MediError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> MediResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(MediError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_u64(value: &str) -> MediResult<u64> {
    value
        .parse()
        .map_err(|_| MediError::User(format!("Invalid number: {}", value)))
}
