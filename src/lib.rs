#[macro_use]
mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod logging;
pub mod paths;
pub mod query;
pub mod remote;
pub mod server;
pub mod store;
pub mod types;

pub use config::Config;
pub use controller::{ListAction, ListController, ListView, Reconciled};
pub use error::{DeskError, RequestError, Result};
pub use query::{Filter, FilterChange, PAGE_SIZE, QueryState, SortColumn, SortDirection, SortSpec};
pub use remote::{HttpGateway, IssueSink, IssueSource, ResultPage};
pub use store::IssueStore;
pub use types::{Assignee, Issue, IssueDraft, IssueId, IssuePayload, IssuePriority, IssueStatus};
