mod browse;
mod config;
mod create;
mod ls;
mod serve;
mod show;
mod update;

pub use browse::{BrowseCommand, cmd_browse, run_session};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use create::{CreateOptions, cmd_create};
pub use ls::{LsOptions, cmd_ls};
pub use serve::cmd_serve;
pub use show::cmd_show;
pub use update::{UpdateOptions, cmd_update};

use serde_json::Value;

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::remote::HttpGateway;

/// Result of a command: a JSON document, plus optional human text.
///
/// Without text, the JSON is printed in both modes.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Gateway for the configured API, with environment overrides applied.
pub fn connect() -> Result<HttpGateway> {
    let config = Config::load()?;
    HttpGateway::new(&config.effective_api())
}
