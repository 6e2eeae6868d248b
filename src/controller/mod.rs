//! The list controller.
//!
//! Owns the [`QueryState`] and the last fetched [`ResultPage`]. Every
//! selection change goes through [`ListController::dispatch`], which tags a
//! fetch with the next sequence number; [`ListController::reconcile`] applies
//! an outcome only if it carries the latest tag. Older outcomes are dropped,
//! so out-of-order responses can never show results for a selection that is
//! no longer current.
//!
//! Writes go through [`ListController::submit`] and friends: validate, send,
//! and on success re-fetch the current selection.

mod model;


use tracing::{debug, warn};

use crate::error::RequestError;
use crate::query::{PAGE_SIZE, QueryState, range_label, total_pages};
use crate::remote::{IssueSink, IssueSource, ResultPage};
use crate::types::{Issue, IssueDraft, IssueId, IssuePayload};

pub use model::{
    FetchOutcome, FetchRequest, ListAction, ListView, Notice, NoticeLevel, PendingMutation,
    Reconciled, SyncStatus,
};

pub struct ListController<G> {
    gateway: G,
    query: QueryState,
    page: ResultPage,
    status: SyncStatus,
    last_error: Option<RequestError>,
    latest_seq: u64,
    pending: Option<PendingMutation>,
    notice: Option<Notice>,
}

impl<G> ListController<G>
where
    G: IssueSource + IssueSink,
{
    pub fn new(gateway: G) -> Self {
        Self::with_query(gateway, QueryState::default())
    }

    /// Start from a given selection. Nothing is fetched until the first
    /// dispatch.
    pub fn with_query(gateway: G, query: QueryState) -> Self {
        Self {
            gateway,
            query,
            page: ResultPage::default(),
            status: SyncStatus::Idle,
            last_error: None,
            latest_seq: 0,
            pending: None,
            notice: None,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn page(&self) -> &ResultPage {
        &self.page
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SyncStatus::Fetching
    }

    pub fn last_error(&self) -> Option<&RequestError> {
        self.last_error.as_ref()
    }

    /// Page count for the last-known total.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.page.total, PAGE_SIZE)
    }

    pub fn pending(&self) -> Option<&PendingMutation> {
        self.pending.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    // ------------------------------------------------------------------
    // Read cycle
    // ------------------------------------------------------------------

    /// Apply `action` to the selection and issue a fetch for the result.
    ///
    /// The returned request supersedes every request issued before it.
    pub fn dispatch(&mut self, action: ListAction) -> FetchRequest {
        match action {
            ListAction::SetSearch(text) => self.query.set_search(text),
            ListAction::SetFilter(change) => self.query.set_filter(change),
            ListAction::SetSort(column) => self.query.set_sort(column),
            ListAction::SetPage(requested) => {
                let pages = self.total_pages();
                self.query.set_page(requested, pages);
            }
            ListAction::Refresh => {}
        }

        self.latest_seq += 1;
        self.status = SyncStatus::Fetching;
        debug!(seq = self.latest_seq, page = self.query.page, "fetch issued");

        FetchRequest {
            seq: self.latest_seq,
            query: self.query.clone(),
        }
    }

    /// Fold a fetch outcome back into the list.
    pub fn reconcile(&mut self, outcome: FetchOutcome) -> Reconciled {
        if outcome.seq != self.latest_seq {
            debug!(
                seq = outcome.seq,
                latest = self.latest_seq,
                "stale response discarded"
            );
            return Reconciled::Stale {
                seq: outcome.seq,
                latest: self.latest_seq,
            };
        }

        match outcome.result {
            Ok(page) => {
                debug!(
                    seq = outcome.seq,
                    items = page.items.len(),
                    total = page.total,
                    "page applied"
                );
                self.page = page;
                self.status = SyncStatus::Idle;
                self.last_error = None;
                Reconciled::Applied
            }
            Err(err) => {
                warn!(seq = outcome.seq, error = %err, "fetch failed; keeping previous page");
                self.status = SyncStatus::Error;
                self.last_error = Some(err.clone());
                Reconciled::Failed(err)
            }
        }
    }

    /// Dispatch, fetch and reconcile in one go.
    pub async fn apply(&mut self, action: ListAction) -> Reconciled {
        let request = self.dispatch(action);
        let outcome = request.run(&self.gateway).await;
        self.reconcile(outcome)
    }

    pub async fn refresh(&mut self) -> Reconciled {
        self.apply(ListAction::Refresh).await
    }

    // ------------------------------------------------------------------
    // Write cycle
    // ------------------------------------------------------------------

    pub fn open_create(&mut self) {
        self.pending = Some(PendingMutation::Create);
    }

    pub fn open_edit(&mut self, issue: Issue) {
        self.pending = Some(PendingMutation::Edit(issue));
    }

    pub fn cancel_edit(&mut self) {
        self.pending = None;
    }

    /// Initial values for the open form, if any.
    pub fn draft(&self) -> Option<IssueDraft> {
        self.pending.as_ref().map(PendingMutation::draft)
    }

    /// Submit the open form, as a create or an update depending on how it
    /// was opened.
    pub async fn submit(&mut self, draft: &IssueDraft) -> Result<Issue, RequestError> {
        match self.pending.clone() {
            Some(PendingMutation::Create) => self.submit_create(draft).await,
            Some(PendingMutation::Edit(issue)) => self.submit_update(issue.id, draft).await,
            None => Err(RequestError::validation("form", "no create or edit form is open")),
        }
    }

    pub async fn submit_create(&mut self, draft: &IssueDraft) -> Result<Issue, RequestError> {
        let payload = self.validated(draft)?;
        let result = self.gateway.create_issue(&payload).await;
        self.settle(result, "Issue created").await
    }

    pub async fn submit_update(
        &mut self,
        id: IssueId,
        draft: &IssueDraft,
    ) -> Result<Issue, RequestError> {
        let payload = self.validated(draft)?;
        let result = self.gateway.update_issue(id, &payload).await;
        self.settle(result, "Issue updated").await
    }

    fn validated(&mut self, draft: &IssueDraft) -> Result<IssuePayload, RequestError> {
        draft.validate().inspect_err(|err| {
            self.notice = Some(Notice::error(err.to_string()));
        })
    }

    /// Close the form and refresh on success; keep everything on failure.
    async fn settle(
        &mut self,
        result: Result<Issue, RequestError>,
        success: &str,
    ) -> Result<Issue, RequestError> {
        match result {
            Ok(issue) => {
                debug!(id = issue.id, "mutation succeeded");
                self.pending = None;
                self.notice = Some(Notice::success(success));
                self.refresh().await;
                Ok(issue)
            }
            Err(err) => {
                warn!(error = %err, "mutation failed");
                self.notice = Some(Notice::error(format!("Failed to save issue: {err}")));
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Presentation
    // ------------------------------------------------------------------

    pub fn view(&self) -> ListView {
        ListView {
            items: self.page.items.clone(),
            total: self.page.total,
            page: self.query.page,
            total_pages: self.total_pages(),
            range: range_label(self.query.page, PAGE_SIZE, self.page.total),
            sort: self.query.sort,
            is_loading: self.is_loading(),
            last_error: self.last_error.clone(),
            search_term: self.query.search_term.clone(),
            status_filter: self.query.status_filter,
            priority_filter: self.query.priority_filter,
            assignee_filter: self.query.assignee_filter,
            pending: self.pending.clone(),
            notice: self.notice.clone(),
        }
    }
}
