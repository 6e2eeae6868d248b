//! In-memory issue collection.
//!
//! Backs the reference server and doubles as an in-process [`IssueSource`] /
//! [`IssueSink`] for the controller. Issues are kept in id order; every query
//! filters, sorts and slices a snapshot under the read lock.

mod seed;

use std::cmp::Ordering;

use jiff::{SignedDuration, Timestamp};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::error::RequestError;
use crate::query::{PAGE_SIZE, QueryState, SortColumn, SortDirection, SortSpec};
use crate::remote::{IssueSink, IssueSource, ResultPage};
use crate::types::{Assignee, Issue, IssueId, IssuePayload, IssuePriority, IssueStatus};

pub use seed::seed_payloads;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Issue not found")]
    NotFound(IssueId),

    #[error(transparent)]
    Invalid(RequestError),
}

impl From<StoreError> for RequestError {
    /// Map onto what the HTTP surface would answer, so in-process and remote
    /// collections fail the same way.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => RequestError::Server {
                status: 404,
                message: err.to_string(),
            },
            StoreError::Invalid(e) => RequestError::Server {
                status: 422,
                message: e.to_string(),
            },
        }
    }
}

/// Server-side form of a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    pub search: Option<String>,
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub assignee: Option<Assignee>,
    pub sort: SortSpec,
    pub page: u32,
    pub page_size: u32,
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            priority: None,
            assignee: None,
            sort: SortSpec::default(),
            page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl From<&QueryState> for IssueQuery {
    fn from(state: &QueryState) -> Self {
        Self {
            search: Some(state.search_term.clone()).filter(|s| !s.is_empty()),
            status: state.status_filter.value(),
            priority: state.priority_filter.value(),
            assignee: state.assignee_filter.value(),
            sort: state.sort,
            page: state.page,
            page_size: PAGE_SIZE,
        }
    }
}

impl IssueQuery {
    fn matches(&self, issue: &Issue, needle: Option<&str>) -> bool {
        if let Some(needle) = needle
            && !issue.title.to_lowercase().contains(needle)
        {
            return false;
        }
        self.status.is_none_or(|s| issue.status == s)
            && self.priority.is_none_or(|p| issue.priority == p)
            && self.assignee.is_none_or(|a| issue.assignee == a)
    }
}

#[derive(Debug, Clone)]
struct Record {
    issue: Issue,
    updated: Timestamp,
}

fn compare(column: SortColumn, a: &Record, b: &Record) -> Ordering {
    match column {
        SortColumn::Id => a.issue.id.cmp(&b.issue.id),
        SortColumn::Title => a.issue.title.cmp(&b.issue.title),
        SortColumn::Status => a.issue.status.as_str().cmp(b.issue.status.as_str()),
        SortColumn::Priority => a.issue.priority.rank().cmp(&b.issue.priority.rank()),
        SortColumn::Assignee => a.issue.assignee.as_str().cmp(b.issue.assignee.as_str()),
        SortColumn::UpdatedAt => a.updated.cmp(&b.updated),
    }
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<Record>,
    next_id: IssueId,
    last_stamp: Option<Timestamp>,
}

impl Inner {
    /// Wall-clock time, nudged forward so no two mutations share a stamp.
    fn next_stamp(&mut self) -> Timestamp {
        let now = Timestamp::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last
                .checked_add(SignedDuration::from_nanos(1))
                .unwrap_or(last),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn position(&self, id: IssueId) -> Option<usize> {
        self.records
            .binary_search_by_key(&id, |r| r.issue.id)
            .ok()
    }

    fn insert(&mut self, payload: IssuePayload) -> Issue {
        let stamp = self.next_stamp();
        self.next_id += 1;
        let issue = Issue {
            id: self.next_id,
            title: payload.title,
            description: payload.description,
            status: payload.status,
            priority: payload.priority,
            assignee: payload.assignee,
            created_at: stamp.to_string(),
            updated_at: stamp.to_string(),
        };
        self.records.push(Record {
            issue: issue.clone(),
            updated: stamp,
        });
        issue
    }
}

#[derive(Debug, Default)]
pub struct IssueStore {
    inner: RwLock<Inner>,
}

impl IssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the ten sample issues, ids 1 through 10.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write();
            for payload in seed_payloads() {
                inner.insert(payload);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: IssueId) -> Result<Issue, StoreError> {
        let inner = self.inner.read();
        inner
            .position(id)
            .map(|i| inner.records[i].issue.clone())
            .ok_or(StoreError::NotFound(id))
    }

    /// Filter, sort and slice. Pages past the end come back empty with the
    /// true total.
    pub fn query(&self, query: &IssueQuery) -> ResultPage {
        let inner = self.inner.read();
        let needle = query.search.as_ref().map(|s| s.to_lowercase());

        let mut matched: Vec<&Record> = inner
            .records
            .iter()
            .filter(|r| query.matches(&r.issue, needle.as_deref()))
            .collect();

        // stable: equal keys stay in id order in both directions
        matched.sort_by(|a, b| {
            let ord = compare(query.sort.column, a, b);
            match query.sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = matched.len() as u64;
        let page_size = query.page_size.max(1) as usize;
        let start = (query.page.max(1) as usize - 1).saturating_mul(page_size);
        let items = matched
            .into_iter()
            .skip(start)
            .take(page_size)
            .map(|r| r.issue.clone())
            .collect();

        ResultPage { items, total }
    }

    pub fn create(&self, payload: IssuePayload) -> Result<Issue, StoreError> {
        payload.validate().map_err(StoreError::Invalid)?;
        let issue = self.inner.write().insert(payload);
        debug!(id = issue.id, "issue created");
        Ok(issue)
    }

    /// Replace the editable fields and bump `updatedAt`.
    pub fn update(&self, id: IssueId, payload: IssuePayload) -> Result<Issue, StoreError> {
        payload.validate().map_err(StoreError::Invalid)?;
        let mut inner = self.inner.write();
        let index = inner.position(id).ok_or(StoreError::NotFound(id))?;
        let stamp = inner.next_stamp();

        let record = &mut inner.records[index];
        record.issue.title = payload.title;
        record.issue.description = payload.description;
        record.issue.status = payload.status;
        record.issue.priority = payload.priority;
        record.issue.assignee = payload.assignee;
        record.issue.updated_at = stamp.to_string();
        record.updated = stamp;

        debug!(id, "issue updated");
        Ok(record.issue.clone())
    }
}

impl IssueSource for IssueStore {
    async fn fetch_page(&self, query: &QueryState) -> Result<ResultPage, RequestError> {
        query.validate()?;
        Ok(self.query(&IssueQuery::from(query)))
    }

    async fn fetch_issue(&self, id: IssueId) -> Result<Issue, RequestError> {
        Ok(self.get(id)?)
    }
}

impl IssueSink for IssueStore {
    async fn create_issue(&self, payload: &IssuePayload) -> Result<Issue, RequestError> {
        Ok(self.create(payload.clone())?)
    }

    async fn update_issue(
        &self,
        id: IssueId,
        payload: &IssuePayload,
    ) -> Result<Issue, RequestError> {
        Ok(self.update(id, payload.clone())?)
    }
}
