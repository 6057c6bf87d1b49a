//! HTTP seam and its reqwest-backed implementation

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, COOKIE};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;
use xcfetch_config::NetworkConfig;
use xcfetch_errors::{Error, NetworkError};

/// Response body as a stream of chunks
pub type BodyStream = BoxStream<'static, Result<Bytes, Error>>;

/// A GET request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    pub headers: Vec<(HeaderName, String)>,
}

impl HttpRequest {
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            url,
            headers: Vec::new(),
        }
    }

    /// Add cookies, joining with any `Cookie` header already present
    #[must_use]
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        let cookie = cookie.into();
        if let Some((_, existing)) = self.headers.iter_mut().find(|(name, _)| *name == COOKIE) {
            existing.push_str("; ");
            existing.push_str(&cookie);
        } else {
            self.headers.push((COOKIE, cookie));
        }
        self
    }

    /// Value of the `Cookie` header, if any
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| *name == COOKIE)
            .map(|(_, value)| value.as_str())
    }
}

/// Status, headers and a not-yet-consumed body
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    content_length: Option<u64>,
    body: BodyStream,
}

impl HttpResponse {
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        content_length: Option<u64>,
        body: BodyStream,
    ) -> Self {
        Self {
            status,
            headers,
            content_length,
            body,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Expected body size, when the server announced one
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn into_stream(self) -> BodyStream {
        self.body
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Anything that can perform a GET
///
/// Carries no retry, caching or timeout policy of its own.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send `request` and return once headers have arrived
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error>;
}

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// Maximum silence between two reads
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self::from(&NetworkConfig::default())
    }
}

impl From<&NetworkConfig> for NetConfig {
    fn from(config: &NetworkConfig) -> Self {
        Self {
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// reqwest-backed [`HttpClient`]
#[derive(Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: &NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .read_timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionRefused(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&NetConfig::default())
    }
}

#[async_trait]
impl HttpClient for NetClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        debug!(url = %request.url, "GET");

        let mut builder = self.client.get(request.url.clone());
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let content_length = response.content_length();
        debug!(url = %request.url, status = status.as_u16(), content_length = ?content_length, "Response headers received");

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_transport_error))
            .boxed();

        Ok(HttpResponse::new(status, headers, content_length, body))
    }
}

/// Convert a reqwest failure into the matching network error
fn map_transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        NetworkError::Timeout {
            url: e
                .url()
                .map(std::string::ToString::to_string)
                .unwrap_or_default(),
        }
        .into()
    } else if e.is_connect() {
        NetworkError::ConnectionRefused(e.to_string()).into()
    } else if e.is_builder() {
        NetworkError::InvalidUrl(e.to_string()).into()
    } else {
        NetworkError::DownloadFailed(e.to_string()).into()
    }
}
