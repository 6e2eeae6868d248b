//! Access to the remote issue collection.
//!
//! The list controller only talks to the collection through the two traits
//! here: [`IssueSource`] for reads and [`IssueSink`] for writes. The HTTP
//! implementation lives in [`http`]; the in-memory [`crate::store::IssueStore`]
//! implements both as well.

pub mod error;
pub mod http;

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::query::{PAGE_SIZE, QueryState};
use crate::types::{Issue, IssueId, IssuePayload};

pub use http::HttpGateway;

/// One slice of the collection plus the number of matches across all pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<Issue>,
    pub total: u64,
}

impl ResultPage {
    /// A page can never hold more than a page's worth of items, nor more
    /// items than match in total.
    pub fn check_bounds(&self) -> Result<(), RequestError> {
        let limit = u64::from(PAGE_SIZE).min(self.total);
        let len = self.items.len() as u64;
        if len > limit {
            return Err(RequestError::MalformedResponse(format!(
                "page holds {len} items but at most {limit} are possible (total {})",
                self.total
            )));
        }
        Ok(())
    }
}

/// Read side of the collection.
pub trait IssueSource: Send + Sync {
    /// Fetch the page described by `query`. One read, no retry, no caching.
    fn fetch_page(
        &self,
        query: &QueryState,
    ) -> impl Future<Output = Result<ResultPage, RequestError>> + Send;

    /// Fetch a single issue by id.
    fn fetch_issue(&self, id: IssueId)
    -> impl Future<Output = Result<Issue, RequestError>> + Send;
}

/// Write side of the collection. Implementations never touch list state.
pub trait IssueSink: Send + Sync {
    fn create_issue(
        &self,
        payload: &IssuePayload,
    ) -> impl Future<Output = Result<Issue, RequestError>> + Send;

    /// Replace the editable fields of an existing issue. A missing id is a
    /// failure, not a no-op.
    fn update_issue(
        &self,
        id: IssueId,
        payload: &IssuePayload,
    ) -> impl Future<Output = Result<Issue, RequestError>> + Send;
}

impl<T: IssueSource> IssueSource for Arc<T> {
    fn fetch_page(
        &self,
        query: &QueryState,
    ) -> impl Future<Output = Result<ResultPage, RequestError>> + Send {
        (**self).fetch_page(query)
    }

    fn fetch_issue(&self, id: IssueId) -> impl Future<Output = Result<Issue, RequestError>> + Send {
        (**self).fetch_issue(id)
    }
}

impl<T: IssueSink> IssueSink for Arc<T> {
    fn create_issue(
        &self,
        payload: &IssuePayload,
    ) -> impl Future<Output = Result<Issue, RequestError>> + Send {
        (**self).create_issue(payload)
    }

    fn update_issue(
        &self,
        id: IssueId,
        payload: &IssuePayload,
    ) -> impl Future<Output = Result<Issue, RequestError>> + Send {
        (**self).update_issue(id, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Assignee, IssuePriority, IssueStatus};

    fn issue(id: IssueId) -> Issue {
        Issue {
            id,
            title: format!("Issue {id}"),
            description: "d".to_string(),
            status: IssueStatus::Open,
            priority: IssuePriority::Low,
            assignee: Assignee::Alice,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_bounds_accept_full_page() {
        let page = ResultPage {
            items: (1..=5).map(issue).collect(),
            total: 12,
        };
        assert!(page.check_bounds().is_ok());
    }

    #[test]
    fn test_bounds_accept_empty_page_past_end() {
        let page = ResultPage {
            items: vec![],
            total: 12,
        };
        assert!(page.check_bounds().is_ok());
    }

    #[test]
    fn test_bounds_reject_more_items_than_total() {
        let page = ResultPage {
            items: (1..=3).map(issue).collect(),
            total: 2,
        };
        assert!(matches!(
            page.check_bounds(),
            Err(RequestError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_bounds_reject_oversized_page() {
        let page = ResultPage {
            items: (1..=6).map(issue).collect(),
            total: 40,
        };
        assert!(page.check_bounds().is_err());
    }
}
