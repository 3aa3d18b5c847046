//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use url::Url;

use crate::api::{ClustersApi, ConnectorsApi};
use crate::config::{BasicAuth, TransportConfig};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::transport::Transport;

/// Base URL of a Connect worker on its default port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8083/";

/// Kafka Connect REST API client.
///
/// Cloning is cheap: clones share the same transport and connection pool.
///
/// # Example
///
/// ```no_run
/// use kconnect_client::ConnectClient;
///
/// # async fn example() -> kconnect_client::Result<()> {
/// let client = ConnectClient::builder()
///     .base_url("http://localhost:8083/")
///     .build()?;
///
/// let names = client.connectors().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConnectClient {
    transport: Arc<Transport>,
    clusters: ClustersApi,
    connectors: ConnectorsApi,
}

impl ConnectClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client on top of an existing HTTP client, or a default one
    /// when `http` is `None`.
    pub fn with_http_client(http: Option<reqwest::Client>, base_url: &str) -> Result<Self> {
        let mut builder = Self::builder().base_url(base_url);
        if let Some(http) = http {
            builder = builder.http_client(http);
        }
        builder.build()
    }

    /// Create a client for a worker on localhost:8083.
    pub fn localhost() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL)
    }

    fn from_transport(transport: Transport) -> Self {
        let transport = Arc::new(transport);
        Self {
            clusters: ClustersApi::new(Arc::clone(&transport)),
            connectors: ConnectorsApi::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    /// The transport shared by every API accessor.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the cluster API.
    pub fn clusters(&self) -> &ClustersApi {
        &self.clusters
    }

    /// Access the connectors API.
    pub fn connectors(&self) -> &ConnectorsApi {
        &self.connectors
    }
}

/// Builder for creating a [`ConnectClient`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    http: Option<reqwest::Client>,
    config: TransportConfig,
    timeout: Option<Duration>,
    retry: Option<RetryPolicy>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the worker.
    ///
    /// Operation paths are appended to it verbatim, so it should end with `/`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Use an existing HTTP client instead of building one.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Replace all transport settings at once.
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the per-attempt timeout, overriding `timeout_ms` from the config.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    /// Authenticate every request with HTTP basic auth.
    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.config.basic_auth = Some(BasicAuth {
            username: username.into(),
            password,
        });
        self
    }

    /// Set the retry policy, overriding the declarative retry config.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ConnectClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        let base_url = Url::parse(&base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "unsupported URL scheme: {}",
                base_url.scheme()
            )));
        }
        if !base_url.path().ends_with('/') {
            tracing::warn!(
                base_url = %base_url,
                "Base URL does not end with '/', request paths will be appended directly"
            );
        }

        let timeout = self.timeout.unwrap_or_else(|| self.config.timeout());
        if timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }

        let headers = build_headers(&self.config)?;

        let retry = match self.retry {
            Some(policy) => {
                policy.validate()?;
                policy
            }
            None => self.config.retry.to_policy()?,
        };

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .build()
                .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?,
        };

        tracing::debug!(
            base_url = %base_url,
            timeout = ?timeout,
            max_retries = retry.retries(),
            "Created Connect client"
        );

        let transport = Transport::new(
            http,
            base_url,
            headers,
            self.config.basic_auth,
            timeout,
            retry,
        );
        Ok(ConnectClient::from_transport(transport))
    }
}

/// Default headers: configured extras, then the fixed Accept and User-Agent.
fn build_headers(config: &TransportConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::Config(format!("Invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::Config(format!("Invalid value for header {}", name)))?;
        headers.insert(name, value);
    }

    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("kconnect-client/{}", env!("CARGO_PKG_VERSION")));
    let user_agent = HeaderValue::from_str(&user_agent)
        .map_err(|_| Error::Config("Invalid user agent".to_string()))?;
    headers.insert(USER_AGENT, user_agent);

    Ok(headers)
}
