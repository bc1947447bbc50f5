//! HTTP client for the software database web API

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::header::LOCATION;
use serde_json::Value;

/// Response of a record POST, whatever its status
#[derive(Debug, Clone)]
pub struct PostResponse {
    pub status: u16,
    pub location: Option<String>,
    pub body: String,
}

impl PostResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Last path segment of the `Location` header
    pub fn location_id(&self) -> Option<String> {
        self.location
            .as_deref()
            .map(|l| l.trim_end_matches('/'))
            .and_then(|l| l.rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}

/// Session-holding API client
///
/// The login call sets a session cookie that later POSTs reuse.
pub struct SwdbClient {
    http: reqwest::Client,
    api_url: String,
    web_url: String,
}

impl SwdbClient {
    pub fn new(api_url: &str, web_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            web_url: web_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Bootstrap a session through the test login endpoint
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = format!(
            "{}/testlogin?username={}&password={}",
            self.web_url,
            urlencoding::encode(username),
            urlencoding::encode(password)
        );
        log::debug!("GET {}/testlogin (user {})", self.web_url, username);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Login request to {} failed", self.web_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Login failed with HTTP {}: {}", status.as_u16(), body);
        }

        log::info!("Logged in to {} as {}", self.web_url, username);
        Ok(())
    }

    /// POST a JSON body to `path` under the API URL
    ///
    /// Only transport errors are returned as `Err`; HTTP error statuses are
    /// part of the response.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<PostResponse> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {}", url))?;

        log::debug!("POST {} -> {}", url, status);
        Ok(PostResponse {
            status,
            location,
            body,
        })
    }
}
