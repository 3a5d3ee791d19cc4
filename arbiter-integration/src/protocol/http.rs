use crate::error::SocketError;
use std::time::Duration;

/// Request transport for pull-style exchange endpoints.
///
/// Bodies are consumed as whole strings; timeouts and error statuses surface as
/// [`SocketError`] variants rather than panics, leaving retry policy to the caller.
#[derive(Debug, Clone, Default)]
pub struct RestClient {
    http_client: reqwest::Client,
}

impl RestClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a GET request, returning the response body.
    ///
    /// Error statuses map to [`SocketError::HttpResponse`]; an elapsed `timeout` maps to
    /// [`SocketError::HttpTimeout`].
    pub async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, SocketError> {
        let response = self
            .http_client
            .get(url)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SocketError::HttpResponse(status, body));
        }

        Ok(body)
    }
}
