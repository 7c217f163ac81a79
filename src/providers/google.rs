/*!
 * Google Translate client for the public `translate_a/single` endpoint.
 *
 * The endpoint answers with nested JSON arrays; the first element holds the
 * translated segments, each of which starts with the translated text:
 * `[[["Olá ","Hello ",...],["mundo","world",...]],...]`.
 */

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Proxy, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{TranslateRequest, Translator};

/// Default public endpoint
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Google Translate client
pub struct GoogleTranslate {
    /// Endpoint URL
    endpoint: String,
    /// HTTP client, carrying the optional proxy
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Proxy URL, kept for diagnostics
    proxy: Option<String>,
}

impl GoogleTranslate {
    /// Create a client with default settings and no proxy
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_config(DEFAULT_ENDPOINT, None, 30, 2, 1000)
    }

    /// Create a client with configuration
    pub fn with_config(
        endpoint: impl Into<String>,
        proxy: Option<&str>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90));

        builder = match proxy {
            Some(proxy_url) => {
                let proxy = Proxy::all(proxy_url).map_err(|e| {
                    ProviderError::RequestFailed(format!("Invalid proxy URL {}: {}", proxy_url, e))
                })?;
                builder.proxy(proxy)
            }
            // Only the configured proxy is used, never one from the environment
            None => builder.no_proxy(),
        };

        let client = builder.build().map_err(|e| {
            ProviderError::RequestFailed(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
            max_retries,
            backoff_base_ms,
            proxy: proxy.map(str::to_string),
        })
    }

    /// One HTTP round trip without retries
    async fn request_once(&self, request: &TranslateRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", request.from.as_str()),
                ("tl", request.to.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());

            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                ProviderError::RateLimitExceeded(message)
            } else {
                ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message,
                }
            });
        }

        let body: Value = response.json().await?;
        parse_response(&body)
    }
}

impl std::fmt::Debug for GoogleTranslate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslate")
            .field("endpoint", &self.endpoint)
            .field("proxy", &self.proxy)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(&self, request: &TranslateRequest) -> Result<String, ProviderError> {
        if request.text.trim().is_empty() {
            return Ok(request.text.clone());
        }

        let mut attempt = 0;
        loop {
            match self.request_once(request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.backoff_base_ms.saturating_mul(1 << attempt.min(16));
                    warn!(
                        "Translate request failed (attempt {}/{}), retrying in {}ms: {}",
                        attempt + 1,
                        self.max_retries + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// Concatenate the translated segments of a `translate_a/single` response
pub fn parse_response(body: &Value) -> Result<String, ProviderError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::ParseError("missing translation segments".to_string()))?;

    let mut text = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            text.push_str(part);
        }
    }
    debug!("Parsed {} translated segment(s)", segments.len());

    Ok(text)
}
