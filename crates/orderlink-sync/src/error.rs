use orderlink_core::{NormalizedEmail, RecordId};
use thiserror::Error;

/// Failure talking to the remote records service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("remote returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(err) => err.status().map(|status| status.as_u16()),
            ApiError::Url(_) | ApiError::Decode(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch {collection} at offset {offset}: {source}")]
    Fetch {
        collection: String,
        offset: usize,
        #[source]
        source: ApiError,
    },
    #[error("failed to load {collection} record {id}: {source}")]
    Record {
        collection: String,
        id: RecordId,
        #[source]
        source: ApiError,
    },
    #[error("http client setup failed: {0}")]
    Client(#[source] ApiError),
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// A single client's link request failed. Never aborts a run.
#[derive(Debug, Error)]
#[error("failed to link {orders} orders to client {client} ({email}): {source}")]
pub struct SubmissionError {
    pub client: RecordId,
    pub email: NormalizedEmail,
    pub orders: usize,
    #[source]
    pub source: ApiError,
}
