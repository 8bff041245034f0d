use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppError, AppResult, FetchError, FetchResult};

/// Upstream HTTP client shared by the dataset fetch and the image proxy
#[derive(Debug, Clone)]
pub struct StandardHttpClient {
    client: Client,
}

impl StandardHttpClient {
    /// Create a client with a connect timeout and a total request timeout
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch `url` as text, failing on transport errors and non-2xx statuses
    pub async fn fetch_text(&self, url: &str) -> FetchResult<String> {
        debug!("Fetching text content from: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: format!("Failed to read response: {e}"),
        })?;

        debug!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }

    /// Plain GET with no status handling, for passing responses through
    pub async fn get(&self, url: &str) -> reqwest::Result<Response> {
        self.client.get(url).send().await
    }
}
