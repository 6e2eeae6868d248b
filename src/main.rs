use clap::Parser;
use std::process::ExitCode;

use issuedesk::cli::Cli;
use issuedesk::config::Config;
use issuedesk::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // A broken config file is reported by the command itself; logging just
    // falls back to the default level.
    let level = Config::load()
        .map(|config| config.log.level)
        .unwrap_or_else(|_| Config::default().log.level);
    if logging::init(&level).is_err() {
        let _ = logging::init(&Config::default().log.level);
    }

    match cli.command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
