use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::str::FromStr;

use crate::error::DeskError;
use crate::query::{Filter, SortColumn, SortDirection};
use crate::types::{Assignee, IssueId, IssuePriority, IssueStatus};

#[derive(Parser)]
#[command(name = "issuedesk")]
#[command(about = "Browse and edit a remote issue list")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// How a command prints its result.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List one page of issues
    #[command(visible_alias = "l")]
    Ls {
        /// Case-insensitive title search
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Status filter: Open, "In Progress", Done, or all
        #[arg(long, value_parser = parse_text::<Filter<IssueStatus>>)]
        status: Option<Filter<IssueStatus>>,

        /// Priority filter: Low, Medium, High, or all
        #[arg(long, value_parser = parse_text::<Filter<IssuePriority>>)]
        priority: Option<Filter<IssuePriority>>,

        /// Assignee filter: a team member's name, or all
        #[arg(long, value_parser = parse_text::<Filter<Assignee>>)]
        assignee: Option<Filter<Assignee>>,

        /// Sort column: id, title, status, priority, assignee, updatedAt
        #[arg(long, value_parser = parse_text::<SortColumn>)]
        sort: Option<SortColumn>,

        /// Sort direction: asc or desc
        #[arg(long = "dir", value_parser = parse_text::<SortDirection>)]
        direction: Option<SortDirection>,

        /// Page to show (clamped to the available pages)
        #[arg(long, allow_negative_numbers = true)]
        page: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a single issue
    #[command(visible_alias = "s")]
    Show {
        /// Issue ID
        id: IssueId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new issue
    #[command(visible_alias = "c")]
    Create {
        /// Issue title
        #[arg(short, long)]
        title: String,

        /// Description text
        #[arg(short, long)]
        description: String,

        /// Status (default: Open)
        #[arg(long)]
        status: Option<String>,

        /// Priority (default: Low)
        #[arg(short, long)]
        priority: Option<String>,

        /// Assignee (default: Alice)
        #[arg(short, long)]
        assignee: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an existing issue; unset fields keep their current value
    #[command(visible_alias = "u")]
    Update {
        /// Issue ID
        id: IssueId,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New status
        #[arg(long)]
        status: Option<String>,

        /// New priority
        #[arg(short, long)]
        priority: Option<String>,

        /// New assignee
        #[arg(short, long)]
        assignee: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive, line-oriented list session
    Browse,

    /// Run the reference issue API over a seeded in-memory store
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8000 (default: server.bind)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (api.base_url, api.timeout_secs, api.connect_timeout_secs, server.bind, log.level)
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api.base_url, api.timeout_secs, api.connect_timeout_secs, server.bind, log.level)
        key: String,
        /// Value to set
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            CreateOptions, LsOptions, UpdateOptions, cmd_browse, cmd_config_get, cmd_config_set,
            cmd_config_show, cmd_create, cmd_ls, cmd_serve, cmd_show, cmd_update,
        };

        match self {
            Commands::Ls {
                search,
                status,
                priority,
                assignee,
                sort,
                direction,
                page,
                json,
            } => {
                cmd_ls(
                    LsOptions {
                        search,
                        status,
                        priority,
                        assignee,
                        sort,
                        direction,
                        page,
                    },
                    OutputOptions { json },
                )
                .await
            }
            Commands::Show { id, json } => cmd_show(id, OutputOptions { json }).await,
            Commands::Create {
                title,
                description,
                status,
                priority,
                assignee,
                json,
            } => {
                cmd_create(
                    CreateOptions {
                        title,
                        description,
                        status,
                        priority,
                        assignee,
                    },
                    OutputOptions { json },
                )
                .await
            }
            Commands::Update {
                id,
                title,
                description,
                status,
                priority,
                assignee,
                json,
            } => {
                cmd_update(
                    id,
                    UpdateOptions {
                        title,
                        description,
                        status,
                        priority,
                        assignee,
                    },
                    OutputOptions { json },
                )
                .await
            }
            Commands::Browse => cmd_browse().await,
            Commands::Serve { bind } => cmd_serve(bind).await,
            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(OutputOptions { json }),
                ConfigAction::Get { key, json } => cmd_config_get(&key, OutputOptions { json }),
                ConfigAction::Set { key, value, json } => {
                    cmd_config_set(&key, &value, OutputOptions { json })
                }
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Value parser for anything with the crate's `FromStr` convention.
fn parse_text<T: FromStr<Err = DeskError>>(s: &str) -> Result<T, String> {
    s.parse().map_err(|e: DeskError| e.to_string())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "issuedesk", &mut io::stdout());
}
