//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests paced by the global rate limiter
//! - Writing bodies into the mirror tree through the handle gate
//! - Error classification

use crate::config::CrawlerConfig;
use crate::crawler::handle_gate::HandleGate;
use crate::crawler::parser::extract_links_from_bytes;
use crate::crawler::rate_limiter::RateLimiter;
use crate::url::mirror_path;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The body was downloaded and written to the mirror tree
    Success {
        /// Whether the response declared `text/html`
        is_html: bool,
        /// Response body
        body: Vec<u8>,
        /// Where the body was written
        path: PathBuf,
        /// Raw hrefs found in the body (empty for non-HTML)
        links: Vec<String>,
    },

    /// A response arrived with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// No usable response (connection, DNS, TLS, timeout, body read)
    NetworkError {
        /// Category message, free of the request URL
        error: String,
    },

    /// The response could not be written to disk
    WriteError {
        /// The path that could not be written
        path: PathBuf,
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use mirror_crawl::config::CrawlerConfig;
/// use mirror_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .connect_timeout(config.request_timeout().min(std::time::Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true when the `content-type` header names HTML
pub fn is_html_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

/// Maps a transport error to a stable category message
///
/// Messages never contain the request URL, so identical failures on different
/// pages share one error category.
pub fn classify_transport_error(error: reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_body() || error.is_decode() {
        "failed to read response body".to_string()
    } else {
        error.without_url().to_string()
    }
}

/// Downloads URLs into the mirror tree
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    rate_limiter: Arc<RateLimiter>,
    handle_gate: HandleGate,
    output_dir: PathBuf,
}

impl Fetcher {
    /// Creates a fetcher that writes into `output_dir`
    pub fn new(
        client: Client,
        rate_limiter: Arc<RateLimiter>,
        handle_gate: HandleGate,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            client,
            rate_limiter,
            handle_gate,
            output_dir,
        }
    }

    /// Root of the mirror tree
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fetches a claimed URL and writes it to the mirror tree
    ///
    /// # Request Flow
    ///
    /// 1. Wait for the rate limiter
    /// 2. Send the GET request (redirects are followed by the client)
    /// 3. Non-2xx → `HttpError`; no response → `NetworkError`
    /// 4. Write the body: HTML to `<path>/index.html`, anything else to `<path>`
    /// 5. Record the completed download with the rate limiter, which may hold
    ///    the result back until one interval after the previous completion
    /// 6. For HTML, extract links from the body
    pub async fn fetch(&self, url: &Url) -> FetchResult {
        self.rate_limiter.wait().await;

        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                return FetchResult::NetworkError {
                    error: classify_transport_error(e),
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let is_html = is_html_content_type(response.headers());

        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                return FetchResult::NetworkError {
                    error: classify_transport_error(e),
                }
            }
        };

        let path = mirror_path(&self.output_dir, url, is_html);
        if let Err(e) = self.write_file(&path, &body).await {
            return FetchResult::WriteError {
                path,
                error: e.to_string(),
            };
        }

        self.rate_limiter.record_download().await;

        let links = if is_html {
            extract_links_from_bytes(&body)
        } else {
            Vec::new()
        };

        FetchResult::Success {
            is_html,
            body,
            path,
            links,
        }
    }

    /// Writes `body` to `path`, holding a handle slot while the file is open
    async fn write_file(&self, path: &Path, body: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let _permit = self.handle_gate.acquire().await;
        tracing::trace!(
            "Writing {} ({}/{} handles open)",
            path.display(),
            self.handle_gate.open_handles(),
            self.handle_gate.max_open()
        );
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(body).await?;
        file.flush().await?;

        Ok(())
    }
}
