use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Why an external collaborator could not supply data.
///
/// Always recoverable: the widget that asked shows an "unavailable" state
/// and the rest of the dashboard carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DataUnavailable {
    #[error("request failed: {0}")]
    Http(String),

    #[error("server answered with HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response has no {0}")]
    MissingField(String),

    #[error("no API key configured for {0}")]
    MissingApiKey(&'static str),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for DataUnavailable {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status(status.as_u16());
        }
        if err.is_decode() {
            return Self::Malformed(err.to_string());
        }
        // Strip the URL: it may carry an API key in its query string.
        Self::Http(err.without_url().to_string())
    }
}

/// The state of one dashboard widget's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Availability<T> {
    Available(T),
    Unavailable(DataUnavailable),
}

impl<T> Availability<T> {
    pub fn from_result(result: Result<T, DataUnavailable>) -> Self {
        match result {
            Ok(value) => Self::Available(value),
            Err(reason) => Self::Unavailable(reason),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn as_ref(&self) -> Availability<&T> {
        match self {
            Self::Available(v) => Availability::Available(v),
            Self::Unavailable(e) => Availability::Unavailable(e.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Availability<U> {
        match self {
            Self::Available(v) => Availability::Available(f(v)),
            Self::Unavailable(e) => Availability::Unavailable(e),
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Available(v) => Some(v),
            Self::Unavailable(_) => None,
        }
    }

    /// Render the value, or `fallback` when unavailable.
    pub fn display_or(&self, fallback: &str, render: impl FnOnce(&T) -> String) -> String {
        match self {
            Self::Available(v) => render(v),
            Self::Unavailable(_) => fallback.to_string(),
        }
    }
}
