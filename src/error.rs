use thiserror::Error;

/// Failure of a single read or write against the issue collection.
///
/// Cloneable so the list controller can keep the last failure around for
/// the presentation layer while the previous page stays on screen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The request never completed (connection refused, timeout, reset).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// The body could not be decoded or is missing required fields.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Rejected on the client before any request was made.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl RequestError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        RequestError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Short label for the error class, used in notices and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            RequestError::Transport(_) => "transport",
            RequestError::Server { .. } => "server",
            RequestError::MalformedResponse(_) => "malformed_response",
            RequestError::Validation { .. } => "validation",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RequestError::Server { status: 404, .. })
    }
}

#[derive(Error, Debug)]
pub enum DeskError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("invalid status '{0}' (expected one of: Open, In Progress, Done)")]
    InvalidStatus(String),

    #[error("invalid priority '{0}' (expected one of: Low, Medium, High)")]
    InvalidPriority(String),

    #[error("invalid assignee '{0}'")]
    InvalidAssignee(String),

    #[error("invalid sort column '{0}' (expected one of: id, title, status, priority, assignee, updatedAt)")]
    InvalidSortColumn(String),

    #[error("invalid sort direction '{0}' (expected asc or desc)")]
    InvalidSortDirection(String),

    #[error("invalid filter dimension '{0}' (expected status, priority or assignee)")]
    InvalidFilterDimension(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("{0}")]
    Other(String),
}

impl DeskError {
    /// The request-level failure behind this error, if there is one.
    pub fn as_request(&self) -> Option<&RequestError> {
        match self {
            DeskError::Request(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;
