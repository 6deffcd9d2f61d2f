// GitHub API HTTP client.
// Handles authentication, rate limit tracking, per-call timeouts, and retry with backoff.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, Response, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK, USER_AGENT},
};
use serde::de::DeserializeOwned;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::error::{FolioError, Result};

use super::types::{Page, RateLimit};

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Raw response handed back by a [`Transport`].
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Value of the `Link` header, if any.
    pub link: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single HTTP GET. Implementations do not retry and do not interpret status codes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<ApiResponse>;
}

/// reqwest-backed transport with GitHub headers and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a client. A token switches on bearer authentication.
    pub fn new(token: Option<&str>, request_timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("folio-terminal"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Snapshot of the most recently observed rate limit headers.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let Ok(mut rate_limit) = self.rate_limit.lock() else {
            return;
        };
        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }
}

#[async_trait]
impl Transport for GitHubClient {
    async fn get(&self, url: &str) -> Result<ApiResponse> {
        let response = self.client.get(url).send().await?;
        self.update_rate_limit(&response);

        let status = response.status().as_u16();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(ApiResponse { status, link, body })
    }
}

/// Retry and timeout settings applied to every API call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Backoff unit after a rate-limit response; retry `i` waits `i` units.
    pub rate_limit_backoff: Duration,
    /// Backoff unit after any other failure.
    pub failure_backoff: Duration,
    /// Upper bound on a single attempt.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            rate_limit_backoff: Duration::from_millis(1000),
            failure_backoff: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, error: &FolioError, attempt: u32) -> Duration {
        if error.is_rate_limited() {
            self.rate_limit_backoff * attempt
        } else {
            self.failure_backoff * attempt
        }
    }
}

/// The retrying API client every remote call goes through.
pub struct Api<T> {
    transport: T,
    base_url: String,
    policy: RetryPolicy,
}

impl<T: Transport> Api<T> {
    pub fn new(transport: T, base_url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the full URL for an endpoint path and query parameters.
    pub fn url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String> {
        let base = format!("{}{}", self.base_url, endpoint);
        let url = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, params)
        }
        .map_err(|e| FolioError::Other(format!("invalid URL {}: {}", base, e)))?;
        Ok(url.to_string())
    }

    /// GET with retry. Rate-limit responses back off by `rate_limit_backoff`,
    /// everything else by `failure_backoff`, both growing linearly.
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<ApiResponse> {
        let url = self.url(endpoint, params)?;
        let mut attempt = 0;

        loop {
            match self.attempt(&url).await {
                Ok(response) => return Ok(response),
                Err(err) if attempt < self.policy.max_retries => {
                    attempt += 1;
                    let delay = self.policy.backoff(&err, attempt);
                    warn!(
                        "{} failed ({}), retry {}/{} in {}ms",
                        url,
                        err,
                        attempt,
                        self.policy.max_retries,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// GET and decode the JSON body.
    pub async fn get_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<R> {
        let response = self.get(endpoint, params).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// GET a JSON list and keep its `Link` header.
    pub async fn get_page<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Page<R>> {
        let response = self.get(endpoint, params).await?;
        let items: Vec<R> = serde_json::from_str(&response.body)?;
        Ok(Page {
            items,
            link: response.link,
        })
    }

    async fn attempt(&self, url: &str) -> Result<ApiResponse> {
        let response = timeout(self.policy.timeout, self.transport.get(url))
            .await
            .map_err(|_| FolioError::Timeout {
                url: url.to_string(),
            })??;

        debug!("GET {} -> {}", url, response.status);
        match response.status {
            _ if response.is_success() => Ok(response),
            403 => Err(FolioError::RateLimited {
                url: url.to_string(),
            }),
            status => Err(FolioError::Status {
                status,
                url: url.to_string(),
            }),
        }
    }
}
