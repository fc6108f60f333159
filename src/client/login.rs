use serde::Deserialize;
use serde::de::IgnoredAny;

use super::error::{ClientError, Result};

/// The body of a successful `POST /auth/login`.
///
/// Deployments answer with a bare token string, or with an object carrying
/// the token under `access_token`, `token` or `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Bare(String),
    Envelope(TokenEnvelope),
    Unrecognized(IgnoredAny),
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenEnvelope {
    #[serde(default)]
    pub access_token: Option<TokenField>,
    #[serde(default)]
    pub token: Option<TokenField>,
    #[serde(default)]
    pub data: Option<TokenField>,
}

/// One token candidate of an envelope; only a string carries a token, so a
/// member of another type never rejects its siblings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenField {
    Text(String),
    Other(IgnoredAny),
}

impl TokenField {
    fn into_text(self) -> Option<String> {
        match self {
            TokenField::Text(text) => Some(text),
            TokenField::Other(_) => None,
        }
    }
}

impl LoginResponse {
    /// Decodes a login body. Anything that is not JSON is taken as bare text.
    pub fn from_body(body: &[u8]) -> Self {
        match sonic_rs::from_slice::<LoginResponse>(body) {
            Ok(response) => response,
            Err(_) => LoginResponse::Bare(String::from_utf8_lossy(body).trim().to_string()),
        }
    }

    /// Returns the first non-empty token candidate.
    pub fn into_token(self) -> Result<String> {
        let candidate = match self {
            LoginResponse::Bare(token) => Some(token),
            LoginResponse::Envelope(envelope) => [envelope.access_token, envelope.token, envelope.data]
                .into_iter()
                .flatten()
                .filter_map(TokenField::into_text)
                .find(|token| !token.trim().is_empty()),
            LoginResponse::Unrecognized(_) => None,
        };

        candidate
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ClientError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(body: &str) -> Result<String> {
        LoginResponse::from_body(body.as_bytes()).into_token()
    }

    #[test]
    fn reads_access_token_first() {
        assert_eq!(
            token(r#"{"access_token":"abc","token":"def","token_type":"bearer"}"#).unwrap(),
            "abc"
        );
    }

    #[test]
    fn falls_back_to_token_then_data() {
        assert_eq!(token(r#"{"token":"def"}"#).unwrap(), "def");
        assert_eq!(token(r#"{"access_token":"","data":"ghi"}"#).unwrap(), "ghi");
    }

    #[test]
    fn skips_candidates_that_are_not_strings() {
        assert_eq!(token(r#"{"access_token":123,"token":"def"}"#).unwrap(), "def");
        assert_eq!(token(r#"{"access_token":{"v":1},"token":null,"data":"ghi"}"#).unwrap(), "ghi");
    }

    #[test]
    fn accepts_a_bare_string() {
        assert_eq!(token(r#""xyz""#).unwrap(), "xyz");
        assert_eq!(token("raw-token\n").unwrap(), "raw-token");
    }

    #[test]
    fn rejects_bodies_without_a_token() {
        assert!(matches!(token("{}"), Err(ClientError::MissingToken)));
        assert!(matches!(token(""), Err(ClientError::MissingToken)));
        assert!(matches!(token(r#"{"data":{"token":"nested"}}"#), Err(ClientError::MissingToken)));
        assert!(matches!(token("[1,2]"), Err(ClientError::MissingToken)));
        assert!(matches!(token(r#"{"access_token":"  "}"#), Err(ClientError::MissingToken)));
        assert!(matches!(token(r#"{"access_token":123,"token":false}"#), Err(ClientError::MissingToken)));
    }
}
