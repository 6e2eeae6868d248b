//! Canonical translation of a [`QueryState`] into request parameters.

use url::form_urlencoded;

use super::pagination::PAGE_SIZE;
use super::state::QueryState;

/// Ordered query parameters for `GET /issues`.
///
/// Order is fixed (`q, status, priority, assignee, sort_by, sort_dir, page,
/// page_size`) so the same state always yields the same query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn from_state(state: &QueryState) -> Self {
        let mut pairs = Vec::with_capacity(8);

        if !state.search_term.is_empty() {
            pairs.push(("q", state.search_term.clone()));
        }
        if let Some(status) = state.status_filter.value() {
            pairs.push(("status", status.to_string()));
        }
        if let Some(priority) = state.priority_filter.value() {
            pairs.push(("priority", priority.to_string()));
        }
        if let Some(assignee) = state.assignee_filter.value() {
            pairs.push(("assignee", assignee.to_string()));
        }
        pairs.push(("sort_by", state.sort.column.to_string()));
        pairs.push(("sort_dir", state.sort.direction.to_string()));
        pairs.push(("page", state.page.to_string()));
        pairs.push(("page_size", PAGE_SIZE.to_string()));

        Self { pairs }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `application/x-www-form-urlencoded` rendering, usable as a cache key.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

impl From<&QueryState> for QueryParams {
    fn from(state: &QueryState) -> Self {
        QueryParams::from_state(state)
    }
}
