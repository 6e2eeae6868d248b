//! HTTP gateway for the issue API.
//!
//! - `GET /issues?...` for pages
//! - `GET /issues/{id}` for a single issue
//! - `POST /issues` and `PUT /issues/{id}` for writes
//!
//! Every call is a single round trip. Nothing is retried or cached here;
//! the caller decides what a failure means for its state.

use std::time::Duration;

use reqwest::{Client, Method, Response};
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{DeskError, RequestError, Result};
use crate::query::{QueryParams, QueryState};
use crate::types::{Issue, IssueId, IssuePayload};

use super::error::{decode_body, server_error};
use super::{IssueSink, IssueSource, ResultPage};

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Build a gateway from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| DeskError::Config(format!("failed to create HTTP client: {e}")))?;

        Self::with_client(client, &config.base_url)
    }

    /// Build a gateway around an existing client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(DeskError::Config(format!(
                "'{base_url}' cannot be used as an API base URL"
            )));
        }
        // Url::join replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, RequestError> {
        self.base_url
            .join(path)
            .map_err(|e| RequestError::Transport(format!("invalid request URL: {e}")))
    }

    /// URL of the page request for `query`.
    pub fn page_url(&self, query: &QueryState) -> std::result::Result<Url, RequestError> {
        let mut url = self.endpoint("issues")?;
        url.set_query(Some(&QueryParams::from_state(query).to_query_string()));
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        payload: Option<&IssuePayload>,
    ) -> std::result::Result<Vec<u8>, RequestError> {
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "request did not complete");
            RequestError::Transport(e.to_string())
        })?;

        read_body(response).await
    }
}

async fn read_body(response: Response) -> std::result::Result<Vec<u8>, RequestError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| RequestError::Transport(format!("failed to read response body: {e}")))?;

    if !status.is_success() {
        let err = server_error(status, &body);
        warn!(status = status.as_u16(), error = %err, "request rejected");
        return Err(err);
    }

    debug!(status = status.as_u16(), bytes = body.len(), "response received");
    Ok(body.to_vec())
}

impl IssueSource for HttpGateway {
    async fn fetch_page(&self, query: &QueryState) -> std::result::Result<ResultPage, RequestError> {
        let url = self.page_url(query)?;
        let body = self.send(Method::GET, url, None).await?;
        let page: ResultPage = decode_body(&body)?;
        page.check_bounds()?;
        Ok(page)
    }

    async fn fetch_issue(&self, id: IssueId) -> std::result::Result<Issue, RequestError> {
        let url = self.endpoint(&format!("issues/{id}"))?;
        let body = self.send(Method::GET, url, None).await?;
        decode_body(&body)
    }
}

impl IssueSink for HttpGateway {
    async fn create_issue(
        &self,
        payload: &IssuePayload,
    ) -> std::result::Result<Issue, RequestError> {
        let url = self.endpoint("issues")?;
        let body = self.send(Method::POST, url, Some(payload)).await?;
        decode_body(&body)
    }

    async fn update_issue(
        &self,
        id: IssueId,
        payload: &IssuePayload,
    ) -> std::result::Result<Issue, RequestError> {
        let url = self.endpoint(&format!("issues/{id}"))?;
        let body = self.send(Method::PUT, url, Some(payload)).await?;
        decode_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Filter, FilterChange};
    use crate::types::IssueStatus;

    fn gateway(base: &str) -> HttpGateway {
        HttpGateway::with_client(Client::new(), base).unwrap()
    }

    #[test]
    fn test_page_url_default_state() {
        let url = gateway("http://127.0.0.1:8000")
            .page_url(&QueryState::new())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/issues?sort_by=updatedAt&sort_dir=desc&page=1&page_size=5"
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let mut state = QueryState::new();
        state.set_filter(FilterChange::Status(Filter::Only(IssueStatus::Open)));
        let url = gateway("http://example.test/api").page_url(&state).unwrap();
        assert_eq!(url.path(), "/api/issues");
        assert_eq!(
            url.query(),
            Some("status=Open&sort_by=updatedAt&sort_dir=desc&page=1&page_size=5")
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(HttpGateway::with_client(Client::new(), "mailto:ops@example.test").is_err());
        assert!(HttpGateway::with_client(Client::new(), "not a url").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // port 9 (discard) is closed on test machines
        let gw = gateway("http://127.0.0.1:9");
        let err = gw.fetch_page(&QueryState::new()).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
