//! Operations context for dependency injection

use chrono::{DateTime, Utc};
use std::sync::Arc;
use xcfetch_config::Config;
use xcfetch_errors::Error;
use xcfetch_net::HttpClient;
use xcfetch_progress::OutputSink;

/// Source of wall-clock time for reports
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Operations context providing access to all components
pub struct OpsCtx<S: OutputSink> {
    /// HTTP transport
    pub client: Arc<dyn HttpClient>,
    /// Where progress output goes
    pub sink: S,
    pub clock: Arc<dyn Clock>,
    /// Effective configuration
    pub config: Config,
}

/// Builder for operations context
pub struct OpsContextBuilder<S: OutputSink> {
    client: Option<Arc<dyn HttpClient>>,
    sink: Option<S>,
    clock: Option<Arc<dyn Clock>>,
    config: Option<Config>,
}

impl<S: OutputSink> OpsContextBuilder<S> {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: None,
            sink: None,
            clock: None,
            config: None,
        }
    }

    /// Set HTTP client
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set output sink
    #[must_use]
    pub fn with_sink(mut self, sink: S) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// The clock defaults to [`SystemClock`]; every other component is
    /// required.
    ///
    /// # Errors
    ///
    /// Returns an error if a required component is missing.
    pub fn build(self) -> Result<OpsCtx<S>, Error> {
        let client = self
            .client
            .ok_or_else(|| Error::internal("HTTP client is required"))?;
        let sink = self
            .sink
            .ok_or_else(|| Error::internal("output sink is required"))?;
        let config = self
            .config
            .ok_or_else(|| Error::internal("config is required"))?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(OpsCtx {
            client,
            sink,
            clock,
            config,
        })
    }
}

impl<S: OutputSink> Default for OpsContextBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcfetch_net::{HttpRequest, HttpResponse};
    use xcfetch_progress::MemorySink;

    struct NoNetwork;

    #[async_trait::async_trait]
    impl HttpClient for NoNetwork {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
            Err(Error::internal(format!("unexpected request to {}", request.url)))
        }
    }

    #[test]
    fn test_build_requires_client() {
        let result = OpsContextBuilder::new()
            .with_sink(MemorySink::new())
            .with_config(Config::default())
            .build();
        assert!(matches!(result, Err(Error::Internal(msg)) if msg.contains("HTTP client")));
    }

    #[test]
    fn test_build_requires_config() {
        let result = OpsContextBuilder::new()
            .with_client(Arc::new(NoNetwork))
            .with_sink(MemorySink::new())
            .build();
        assert!(matches!(result, Err(Error::Internal(msg)) if msg.contains("config")));
    }

    #[test]
    fn test_clock_override() {
        let instant = DateTime::parse_from_rfc3339("2024-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let ctx = OpsContextBuilder::new()
            .with_client(Arc::new(NoNetwork))
            .with_sink(MemorySink::new())
            .with_config(Config::default())
            .with_clock(Arc::new(FixedClock(instant)))
            .build()
            .unwrap();
        assert_eq!(ctx.clock.now(), instant);
    }
}
