//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Validate and save one value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let effective = config.effective_api();
    let overridden = effective.base_url != config.api.base_url;

    let json_output = json!({
        "api": {
            "base_url": effective.base_url,
            "base_url_from_env": overridden,
            "timeout_secs": config.api.timeout_secs,
            "connect_timeout_secs": config.api.connect_timeout_secs,
        },
        "server": {
            "bind": config.server.bind,
        },
        "log": {
            "level": config.log.level,
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = format!("{}\n\n", "Configuration:".cyan().bold());

    text_output.push_str(&format!("{}:\n", "api".cyan()));
    text_output.push_str(&format!("  base_url: {}", effective.base_url));
    if overridden {
        text_output.push_str(&format!(" {}", "(from ISSUEDESK_API_URL)".dimmed()));
    }
    text_output.push('\n');
    text_output.push_str(&format!("  timeout_secs: {}\n", config.api.timeout_secs));
    text_output.push_str(&format!(
        "  connect_timeout_secs: {}\n\n",
        config.api.connect_timeout_secs
    ));

    text_output.push_str(&format!("{}:\n", "server".cyan()));
    text_output.push_str(&format!("  bind: {}\n\n", config.server.bind));

    text_output.push_str(&format!("{}:\n", "log".cyan()));
    text_output.push_str(&format!("  level: {}\n\n", config.log.level));

    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(value)
    .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": value,
        "success": true,
    }))
    .with_text(format!("Set {} to {value}", key.cyan()))
    .print(output)
}
