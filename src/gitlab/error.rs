use custom_error::custom_error;
use reqwest::StatusCode;

custom_error! {
    /// Errors surfaced by the GitLab variables client and the CSV sync operations.
    pub SyncError
    Auth { status: StatusCode, body: String } = "GitLab rejected the credentials ({status}): {body}",
    NotFound { status: StatusCode, body: String } = "GitLab project or resource not found ({status}): {body}",
    Api { status: StatusCode, body: String } = "GitLab API error ({status}): {body}",
    Network { source: reqwest::Error } = "HTTP request failed: {source}",
    Decode { source: serde_json::Error } = "Failed to decode GitLab response: {source}",
    Io { source: std::io::Error } = "File error: {source}",
    Csv { source: csv::Error } = "CSV error: {source}",
    MalformedFile { line: u64, reason: String } = "Malformed CSV at line {line}: {reason}",
    EmptyVariableList = "Project has no variables; nothing to derive the CSV header from",
    UnexpectedField { key: String, field: String } = "Variable '{key}' has field '{field}' missing from the CSV header",
    MissingSetting { name: String } = "Missing required setting '{name}'",
    Config { reason: String } = "Invalid configuration: {reason}",
}

impl SyncError {
    /// Classify a non-success HTTP status and its body into a typed error.
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SyncError::Auth { status, body },
            StatusCode::NOT_FOUND => SyncError::NotFound { status, body },
            _ => SyncError::Api { status, body },
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        SyncError::Config {
            reason: reason.into(),
        }
    }

    /// True when the server answered with an unexpected status code.
    pub fn is_http_status(&self) -> bool {
        matches!(
            self,
            SyncError::Auth { .. } | SyncError::NotFound { .. } | SyncError::Api { .. }
        )
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SyncError::Auth { status, .. }
            | SyncError::NotFound { status, .. }
            | SyncError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
