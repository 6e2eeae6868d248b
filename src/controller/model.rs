//! Value types exchanged with the list controller.

use std::fmt;

use serde::Serialize;

use crate::error::RequestError;
use crate::query::{Filter, FilterChange, PageRange, QueryState, SortColumn, SortSpec};
use crate::remote::{IssueSource, ResultPage};
use crate::types::{Assignee, Issue, IssueDraft, IssuePriority, IssueStatus};

/// Where the list is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// No fetch outstanding; the page is current (or nothing was fetched yet).
    #[default]
    Idle,
    /// The latest issued fetch has not come back.
    Fetching,
    /// The latest fetch failed; the previous page is still shown.
    Error,
}

/// A user-driven change to the selection. Each one issues exactly one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    SetSearch(String),
    SetFilter(FilterChange),
    SetSort(SortColumn),
    /// Requested page, clamped against the last-known total.
    SetPage(i64),
    /// Re-fetch the current selection unchanged.
    Refresh,
}

/// An issued fetch: the sequence tag plus a snapshot of the selection it was
/// issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: QueryState,
}

impl FetchRequest {
    /// Perform the read. The outcome keeps the tag so the controller can tell
    /// whether it is still wanted when it arrives.
    pub async fn run<S: IssueSource>(self, source: &S) -> FetchOutcome {
        let result = source.fetch_page(&self.query).await;
        FetchOutcome {
            seq: self.seq,
            result,
        }
    }
}

/// A fetch result on its way back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<ResultPage, RequestError>,
}

/// What the controller did with a [`FetchOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// Latest fetch succeeded; the page was replaced.
    Applied,
    /// Latest fetch failed; the page was kept.
    Failed(RequestError),
    /// A newer fetch had been issued; the outcome was dropped.
    Stale { seq: u64, latest: u64 },
}

impl Reconciled {
    pub fn is_stale(&self) -> bool {
        matches!(self, Reconciled::Stale { .. })
    }
}

/// The open create or edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingMutation {
    Create,
    /// Snapshot of the issue as it was when the form opened.
    Edit(Issue),
}

impl PendingMutation {
    /// Initial form values.
    pub fn draft(&self) -> IssueDraft {
        match self {
            PendingMutation::Create => IssueDraft::blank(),
            PendingMutation::Edit(issue) => IssueDraft::from_issue(issue),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Outcome message of the last mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Everything the presentation layer needs to draw the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub items: Vec<Issue>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub range: PageRange,
    pub sort: SortSpec,
    pub is_loading: bool,
    pub last_error: Option<RequestError>,
    pub search_term: String,
    pub status_filter: Filter<IssueStatus>,
    pub priority_filter: Filter<IssuePriority>,
    pub assignee_filter: Filter<Assignee>,
    pub pending: Option<PendingMutation>,
    pub notice: Option<Notice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_create_draft_is_blank() {
        assert_eq!(PendingMutation::Create.draft(), IssueDraft::blank());
    }

    #[test]
    fn test_notice_levels() {
        assert!(Notice::error("Failed to save issue").is_error());
        assert!(!Notice::success("Issue created").is_error());
        assert_eq!(Notice::success("Issue created").to_string(), "Issue created");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SyncStatus::Fetching).unwrap(),
            "\"fetching\""
        );
    }
}
