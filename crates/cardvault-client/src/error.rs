use reqwest::StatusCode;
use serde::Deserialize;

/// Errors returned by [`CardVaultClient`](crate::CardVaultClient).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure, or a success body that did not decode.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-2xx status.
    #[error("{status} {kind}: {message}")]
    Api {
        status: StatusCode,
        kind: String,
        message: String,
    },
    #[error("query encoding failed: {0}")]
    Query(#[from] serde_qs::Error),
}

impl ClientError {
    /// The service's error kind, e.g. `CARD_NOT_FOUND`.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Api { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            Self::Query(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    kind: String,
    error: String,
}

/// Build an [`ClientError::Api`] from a failed response body. Bodies that are not
/// the service's `{kind, error}` shape are kept verbatim under kind `UNKNOWN`.
pub(crate) fn api_error(status: StatusCode, body: &str) -> ClientError {
    let (kind, message) = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { kind, error }) => (kind, error),
        Err(_) => ("UNKNOWN".to_owned(), body.to_owned()),
    };
    ClientError::Api {
        status,
        kind,
        message,
    }
}
