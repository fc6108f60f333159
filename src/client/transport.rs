use std::sync::Arc;

use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;

use super::error::{ClientError, Result};
use super::store::CredentialStore;

/// The HTTP layer shared by every resource group.
///
/// Attaches the stored bearer token to authenticated requests and maps
/// response statuses to [`ClientError`]. It only reads the credential store.
#[derive(Clone)]
pub struct Transport {
    http: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
}

impl Transport {
    /// Creates a new `Transport`.
    ///
    /// # Arguments
    ///
    /// * `http` - The underlying HTTP client.
    /// * `base_url` - The registry API root, e.g. `http://localhost:8080`.
    /// * `store` - The slot the bearer token is read from.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Transport`, or `InvalidBaseUrl`.
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            http,
            base_url,
            store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn build<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<RequestBuilder> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(sonic_rs::to_vec(body)?);
        }
        Ok(request)
    }

    /// Sends a request carrying the stored bearer token, if there is one.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Bytes> {
        let mut request = self.build(method.clone(), path, body)?;
        if let Some(token) = self.store.get() {
            request = request.bearer_auth(token);
        }

        tracing::debug!("📡 {} {}", method, path);
        Self::dispatch(request).await
    }

    /// Sends a request that never carries a token. Used for login.
    pub async fn send_anonymous<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Bytes> {
        let request = self.build(method.clone(), path, body)?;

        tracing::debug!("📡 {} {} (anonymous)", method, path);
        Self::dispatch(request).await
    }

    async fn dispatch(request: RequestBuilder) -> Result<Bytes> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("❌ Server rejected the credential");
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Could not read the error body: {}", e);
                    String::new()
                }
            };
            tracing::warn!("❌ Request failed with status {}", status);
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?)
    }

    /// Sends an authenticated request and decodes the JSON response.
    pub async fn json<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.send(method, path, body).await?;
        Ok(sonic_rs::from_slice(&bytes)?)
    }
}
