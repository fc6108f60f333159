use thiserror::Error;

/// Errors surfaced by the registry client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-success status other than 401.
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The server rejected the credential (HTTP 401).
    #[error("Unauthorized")]
    Unauthorized,

    /// A login response carried no usable token.
    #[error("Login response did not contain a token")]
    MissingToken,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] sonic_rs::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Whether the server reported the record as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::RequestFailed { status: 404, .. })
    }

    /// Whether the server rejected the credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
