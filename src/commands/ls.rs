use serde_json::{Value, json};

use super::{CommandOutput, connect};
use crate::cli::OutputOptions;
use crate::controller::{ListAction, ListController, ListView, Reconciled};
use crate::display::render_list;
use crate::error::Result;
use crate::query::{Filter, QueryState, SortColumn, SortDirection, SortSpec};
use crate::types::{Assignee, IssuePriority, IssueStatus};

/// Selection for `ls`. Unset filters mean "all".
#[derive(Debug, Clone, Default)]
pub struct LsOptions {
    pub search: Option<String>,
    pub status: Option<Filter<IssueStatus>>,
    pub priority: Option<Filter<IssuePriority>>,
    pub assignee: Option<Filter<Assignee>>,
    pub sort: Option<SortColumn>,
    pub direction: Option<SortDirection>,
    pub page: Option<i64>,
}

impl LsOptions {
    /// The selection as of page 1. A sort column without a direction starts
    /// ascending, the same as picking a new column in the list.
    pub fn to_query(&self) -> QueryState {
        let default_sort = SortSpec::default();
        let sort = match (self.sort, self.direction) {
            (None, None) => default_sort,
            (None, Some(direction)) => SortSpec::new(default_sort.column, direction),
            (Some(column), direction) => {
                SortSpec::new(column, direction.unwrap_or(SortDirection::Asc))
            }
        };

        QueryState {
            search_term: self.search.clone().unwrap_or_default(),
            status_filter: self.status.unwrap_or_default(),
            priority_filter: self.priority.unwrap_or_default(),
            assignee_filter: self.assignee.unwrap_or_default(),
            sort,
            page: 1,
        }
    }
}

pub fn view_json(view: &ListView, query: &QueryState) -> Value {
    json!({
        "items": view.items,
        "total": view.total,
        "page": view.page,
        "totalPages": view.total_pages,
        "range": view.range,
        "sort": view.sort,
        "query": query,
    })
}

/// List one page of issues.
///
/// Page 1 is fetched first; a later page is then requested through the
/// controller so it clamps against the real total.
pub async fn cmd_ls(options: LsOptions, output: OutputOptions) -> Result<()> {
    let mut controller = ListController::with_query(connect()?, options.to_query());

    if let Reconciled::Failed(err) = controller.refresh().await {
        return Err(err.into());
    }
    if let Some(page) = options.page.filter(|p| *p != 1)
        && let Reconciled::Failed(err) = controller.apply(ListAction::SetPage(page)).await
    {
        return Err(err.into());
    }

    let view = controller.view();
    CommandOutput::new(view_json(&view, controller.query()))
        .with_text(render_list(&view))
        .print(output)
}
