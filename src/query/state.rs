//! The view selection: search, filters, sort and page.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::{DeskError, RequestError};
use crate::types::{Assignee, IssuePriority, IssueStatus};

use super::pagination::clamp_page;
use super::sort::{SortColumn, SortSpec};

/// Text of the "no filter" sentinel.
pub const ALL: &str = "all";

/// A categorical filter: either everything, or exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: Copy> Filter<T> {
    /// The selected value, if the filter is active.
    pub fn value(&self) -> Option<T> {
        match self {
            Filter::All => None,
            Filter::Only(v) => Some(*v),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str(ALL),
            Filter::Only(v) => v.fmt(f),
        }
    }
}

impl<T: FromStr<Err = DeskError>> FromStr for Filter<T> {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(Filter::All)
        } else {
            s.parse::<T>().map(Filter::Only)
        }
    }
}

impl<T: fmt::Display> Serialize for Filter<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: FromStr<Err = DeskError>> Deserialize<'de> for Filter<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Which categorical filter a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Status,
    Priority,
    Assignee,
}

enum_display_fromstr!(
    FilterDimension,
    DeskError::InvalidFilterDimension,
    {
        Status => "status",
        Priority => "priority",
        Assignee => "assignee",
    }
);

/// A new value for one filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    Status(Filter<IssueStatus>),
    Priority(Filter<IssuePriority>),
    Assignee(Filter<Assignee>),
}

impl FilterChange {
    /// Parse a value for `dimension`, accepting `all` for every dimension.
    pub fn parse(dimension: FilterDimension, value: &str) -> Result<Self, DeskError> {
        Ok(match dimension {
            FilterDimension::Status => FilterChange::Status(value.parse()?),
            FilterDimension::Priority => FilterChange::Priority(value.parse()?),
            FilterDimension::Assignee => FilterChange::Assignee(value.parse()?),
        })
    }

    pub fn dimension(&self) -> FilterDimension {
        match self {
            FilterChange::Status(_) => FilterDimension::Status,
            FilterChange::Priority(_) => FilterDimension::Priority,
            FilterChange::Assignee(_) => FilterDimension::Assignee,
        }
    }
}

/// Everything that determines which page of issues is wanted.
///
/// Changing the search, a filter or the sort sends the page back to 1; a page
/// index from a larger result set must never leak into a narrower query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryState {
    pub search_term: String,
    pub status_filter: Filter<IssueStatus>,
    pub priority_filter: Filter<IssuePriority>,
    pub assignee_filter: Filter<Assignee>,
    pub sort: SortSpec,
    pub page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status_filter: Filter::All,
            priority_filter: Filter::All,
            assignee_filter: Filter::All,
            sort: SortSpec::default(),
            page: 1,
        }
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_term = text.into();
        self.page = 1;
    }

    pub fn set_filter(&mut self, change: FilterChange) {
        match change {
            FilterChange::Status(f) => self.status_filter = f,
            FilterChange::Priority(f) => self.priority_filter = f,
            FilterChange::Assignee(f) => self.assignee_filter = f,
        }
        self.page = 1;
    }

    pub fn set_sort(&mut self, column: SortColumn) {
        self.sort = self.sort.toggled(column);
        self.page = 1;
    }

    /// Move to `requested`, clamped into `[1, total_pages]`. Leaves every
    /// other field alone.
    pub fn set_page(&mut self, requested: i64, total_pages: u32) {
        self.page = clamp_page(requested, total_pages);
    }

    /// True if any filter or the search narrows the collection.
    pub fn is_filtered(&self) -> bool {
        !self.search_term.is_empty()
            || !self.status_filter.is_all()
            || !self.priority_filter.is_all()
            || !self.assignee_filter.is_all()
    }

    /// Reject states that cannot be expressed as a query. Only reachable
    /// through deserialization, since the setters keep `page >= 1`.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.page < 1 {
            return Err(RequestError::validation("page", "must be at least 1"));
        }
        Ok(())
    }
}
