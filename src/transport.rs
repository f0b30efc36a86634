//! HTTP transport with bounded retry for listing fetches.
//!
//! # Architecture
//!
//! - [`Transport`]: core trait for GET and JSON POST
//! - [`ReqwestTransport`]: `reqwest` implementation with a browser-like User-Agent
//! - [`RetryTransport`]: decorator that retries GETs that failed at the network level
//!
//! # Retry Strategy
//!
//! - Only GET is retried, and only for [`TransportError::is_retryable`] errors
//! - A response with any status code is a success from the transport's point of view
//! - Exponential backoff from `base_delay`, capped at 10 seconds
//! - Random jitter (0-250ms) added to each delay

use crate::config::Settings;
use crate::error::TransportError;
use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Status code and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP used by scrapers and the notifier.
pub trait Transport {
    /// Fetch a page. Non-2xx responses are returned, not turned into errors.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// Send `body` as `application/json`.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    get_timeout: Duration,
    post_timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(settings: &Settings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            get_timeout: settings.get_timeout,
            post_timeout: settings.post_timeout,
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let response = request.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(timeout.as_secs())
            } else if e.is_connect() {
                TransportError::Connect(e.to_string())
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(timeout.as_secs())
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        Ok(HttpResponse { status, body })
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("get_timeout", &self.get_timeout)
            .field("post_timeout", &self.post_timeout)
            .finish()
    }
}

impl Transport for ReqwestTransport {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let t0 = Instant::now();
        let res = self.send(self.client.get(url), self.get_timeout).await;
        match &res {
            Ok(r) => debug!(status = r.status, bytes = r.body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "GET complete"),
            Err(e) => debug!(error = %e, elapsed_ms = t0.elapsed().as_millis() as u64, "GET failed"),
        }
        res
    }

    #[instrument(level = "debug", skip_all)]
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        self.send(self.client.post(url).json(body), self.post_timeout)
            .await
    }
}

/// Wrapper that retries failed GETs of any [`Transport`].
///
/// The delay between attempts follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryTransport<T> {
    inner: T,
    /// Extra attempts after the first one.
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T: Transport> RetryTransport<T> {
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(10),
        }
    }
}

impl<T> fmt::Debug for RetryTransport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryTransport")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T: Transport> Transport for RetryTransport<T> {
    #[instrument(level = "info", skip(self))]
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.get(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if !e.is_retryable() || attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "GET exhausted retries"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1).min(16));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "GET attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        self.inner.post_json(url, body).await
    }
}
