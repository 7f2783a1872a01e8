use shared::{domain::ResourceKind, error::ApiError};
use thiserror::Error;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request: {0}")]
    Api(#[from] ApiError),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("{kind} form is missing required field `{field}`")]
    MissingField {
        kind: ResourceKind,
        field: &'static str,
    },
    #[error("invalid value {value:?} for `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("{kind} form has no field `{field}`")]
    UnknownField { kind: ResourceKind, field: String },
    #[error("`{field}` refers to id {id}, which is not in the loaded collection")]
    UnknownReference { field: &'static str, id: i64 },
    #[error("asked for {expected} but the server returned {got}")]
    UnexpectedCollection {
        expected: ResourceKind,
        got: ResourceKind,
    },
    #[error("no resource tab is active")]
    NoResourceTab,
    #[error("create form is not open")]
    FormNotOpen,
    #[error("no example question at index {0}")]
    UnknownExample(usize),
}

impl ClientError {
    /// True for failures caught locally before any request was issued.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClientError::MissingField { .. }
                | ClientError::InvalidField { .. }
                | ClientError::UnknownField { .. }
                | ClientError::UnknownReference { .. }
        )
    }
}
