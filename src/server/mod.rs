//! Reference HTTP server for the issue API.
//!
//! Routes:
//! - GET  /health       - liveness probe
//! - GET  /issues       - filtered, sorted, paginated listing
//! - POST /issues       - create an issue
//! - GET  /issues/{id}  - read one issue
//! - PUT  /issues/{id}  - replace the editable fields of an issue

mod error;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::error::{DeskError, Result};
use crate::query::{PAGE_SIZE, SortColumn, SortDirection, SortSpec};
use crate::store::{IssueQuery, IssueStore};
use crate::types::{IssueId, IssuePayload};

pub use error::ApiError;

/// Build the router over a shared store.
pub fn router(store: Arc<IssueStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/issues", get(list_issues).post(create_issue))
        .route("/issues/{id}", get(get_issue).put(update_issue))
        .with_state(store)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, store: Arc<IssueStore>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, store).await
}

/// Serve on an already-bound listener until Ctrl-C.
pub async fn serve_on(listener: TcpListener, store: Arc<IssueStore>) -> Result<()> {
    info!(addr = %listener.local_addr()?, issues = store.len(), "issue API listening");
    axum::serve(listener, router(store))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

// ============================================================================
// Query parameters
// ============================================================================

/// Raw `/issues` parameters. Everything arrives as text so that bad values
/// are reported in the `{"detail"}` shape rather than as extractor errors.
#[derive(Debug, Default, Deserialize)]
struct ListParams {
    q: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    assignee: Option<String>,
    sort_by: Option<String>,
    sort_dir: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
}

/// Absent and empty mean the same thing.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_opt<T>(value: Option<String>) -> std::result::Result<Option<T>, ApiError>
where
    T: FromStr<Err = DeskError>,
{
    non_empty(value)
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn parse_positive(
    name: &str,
    value: Option<String>,
    default: u32,
) -> std::result::Result<u32, ApiError> {
    let Some(text) = non_empty(value) else {
        return Ok(default);
    };
    match text.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ApiError::BadRequest(format!(
            "{name} must be an integer >= 1, got '{text}'"
        ))),
    }
}

impl ListParams {
    fn into_query(self) -> std::result::Result<IssueQuery, ApiError> {
        let defaults = SortSpec::default();
        Ok(IssueQuery {
            search: non_empty(self.q),
            status: parse_opt(self.status)?,
            priority: parse_opt(self.priority)?,
            assignee: parse_opt(self.assignee)?,
            sort: SortSpec::new(
                parse_opt::<SortColumn>(self.sort_by)?.unwrap_or(defaults.column),
                parse_opt::<SortDirection>(self.sort_dir)?.unwrap_or(defaults.direction),
            ),
            page: parse_positive("page", self.page, 1)?,
            page_size: parse_positive("page_size", self.page_size, PAGE_SIZE)?,
        })
    }
}

fn parse_id(raw: &str) -> std::result::Result<IssueId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Unprocessable(format!("issue id must be an integer, got '{raw}'")))
}

fn payload(
    body: std::result::Result<Json<IssuePayload>, JsonRejection>,
) -> std::result::Result<IssuePayload, ApiError> {
    let Json(payload) = body.map_err(|e| ApiError::Unprocessable(e.body_text()))?;
    payload
        .validate()
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?;
    Ok(payload)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /issues
async fn list_issues(
    State(store): State<Arc<IssueStore>>,
    Query(params): Query<ListParams>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let query = params.into_query()?;
    let page = store.query(&query);
    debug!(
        page = query.page,
        returned = page.items.len(),
        total = page.total,
        "issues listed"
    );
    Ok(Json(page))
}

/// GET /issues/{id}
async fn get_issue(
    State(store): State<Arc<IssueStore>>,
    Path(id): Path<String>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let issue = store.get(parse_id(&id)?)?;
    Ok(Json(issue))
}

/// POST /issues
async fn create_issue(
    State(store): State<Arc<IssueStore>>,
    body: std::result::Result<Json<IssuePayload>, JsonRejection>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let issue = store.create(payload(body)?)?;
    info!(id = issue.id, "issue created");
    Ok((StatusCode::CREATED, Json(issue)))
}

/// PUT /issues/{id}
async fn update_issue(
    State(store): State<Arc<IssueStore>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<IssuePayload>, JsonRejection>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let issue = store.update(id, payload(body)?)?;
    info!(id, "issue updated");
    Ok(Json(issue))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Assignee, IssueStatus};

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "q" => params.q = value,
                "status" => params.status = value,
                "priority" => params.priority = value,
                "assignee" => params.assignee = value,
                "sort_by" => params.sort_by = value,
                "sort_dir" => params.sort_dir = value,
                "page" => params.page = value,
                "page_size" => params.page_size = value,
                other => panic!("unknown parameter {other}"),
            }
        }
        params
    }

    #[test]
    fn test_defaults_when_nothing_given() {
        let query = ListParams::default().into_query().unwrap();
        assert_eq!(query, IssueQuery::default());
    }

    #[test]
    fn test_full_parameter_set() {
        let query = params(&[
            ("q", "login"),
            ("status", "In Progress"),
            ("assignee", "Bob"),
            ("sort_by", "priority"),
            ("sort_dir", "asc"),
            ("page", "2"),
            ("page_size", "5"),
        ])
        .into_query()
        .unwrap();
        assert_eq!(query.search.as_deref(), Some("login"));
        assert_eq!(query.status, Some(IssueStatus::InProgress));
        assert_eq!(query.priority, None);
        assert_eq!(query.assignee, Some(Assignee::Bob));
        assert_eq!(
            query.sort,
            SortSpec::new(SortColumn::Priority, SortDirection::Asc)
        );
        assert_eq!(query.page, 2);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let query = params(&[("q", ""), ("status", "")]).into_query().unwrap();
        assert_eq!(query.search, None);
        assert_eq!(query.status, None);
    }

    #[test]
    fn test_page_below_one_is_bad_request() {
        for bad in ["0", "-1", "two"] {
            let err = params(&[("page", bad)]).into_query().unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "page={bad}");
        }
        let err = params(&[("page_size", "0")]).into_query().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_unknown_sort_column_is_bad_request() {
        let err = params(&[("sort_by", "createdAt")]).into_query().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("7").unwrap(), 7);
        assert!(matches!(parse_id("seven"), Err(ApiError::Unprocessable(_))));
    }
}
