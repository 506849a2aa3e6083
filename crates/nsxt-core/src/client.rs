//! HTTP service client and connection settings.
//!
//! [`ServiceClient`] wraps a `reqwest` client bound to one NSX-T API surface.
//! Every call is a single request: non-success statuses are handed to the
//! caller's status mapper and never retried.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use crate::config::NsxtProviderConfig;
use crate::error::{Error, Result};
use crate::types::NsxtApi;

// API-specific timeout configurations (in seconds)

/// Default timeout for Manager API requests
pub const MANAGER_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout for Policy API requests
pub const POLICY_DEFAULT_TIMEOUT: u64 = 30;

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// HTTP client configuration.
///
/// Configures HTTP client behavior including timeouts and connection pooling.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct BasicAuth {
    username: String,
    password: SecretString,
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    api: NsxtApi,
    base_url: Url,
    http_config: ClientConfig,
    user_agent: Option<String>,
    basic_auth: Option<BasicAuth>,
    tls_verify: bool,
    ca_cert: Option<PathBuf>,
    client_cert: Option<(PathBuf, PathBuf)>,
}

impl ServiceClientBuilder {
    /// Create a builder for `api` on the given manager host URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not a valid URL.
    pub fn new(api: NsxtApi, host: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let mut host = Url::parse(host.as_ref())?;
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }
        let base_url = host.join(api.base_path())?;

        Ok(Self {
            api,
            base_url,
            http_config: ClientConfig::new().with_timeout(timeout),
            user_agent: None,
            basic_auth: None,
            tls_verify: true,
            ca_cert: None,
            client_cert: None,
        })
    }

    /// Create a builder from a provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured host is invalid.
    pub fn from_config(api: NsxtApi, config: &NsxtProviderConfig) -> Result<Self> {
        let mut builder = Self::new(api, config.manager_url()?, config.timeout())?
            .with_tls_verify(!config.allow_unverified_ssl);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.with_basic_auth(username.clone(), password.expose_secret());
        }
        if let Some(ca_file) = &config.ca_file {
            builder = builder.with_ca_cert(ca_file.clone());
        }
        if let (Some(cert), Some(key)) = (&config.client_auth_cert_file, &config.client_auth_key_file)
        {
            builder = builder.with_client_cert(cert.clone(), key.clone());
        }
        Ok(builder)
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.into(),
            password: SecretString::from(password.into()),
        });
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an additional CA bundle (PEM).
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.ca_cert = Some(path);
        self
    }

    /// Authenticate with a client certificate and private key (PEM).
    #[must_use]
    pub fn with_client_cert(mut self, cert: PathBuf, key: PathBuf) -> Self {
        self.client_cert = Some((cert, key));
        self
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if a certificate cannot be loaded or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let api = self.api;
        let config = &self.http_config;

        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .gzip(config.enable_compression);

        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        if !self.tls_verify {
            warn!(api = %api, "TLS verification disabled for NSX-T client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.ca_cert {
            debug!("loading NSX-T CA certificate from {}", ca_cert.display());
            let bytes = read_pem(ca_cert, "CA certificate")?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        if let Some((cert, key)) = &self.client_cert {
            debug!("loading NSX-T client certificate from {}", cert.display());
            let mut pem = read_pem(cert, "client certificate")?;
            pem.push(b'\n');
            pem.extend(read_pem(key, "client key")?);
            let identity = reqwest::Identity::from_pem(&pem)
                .map_err(|err| Error::ConfigError(format!("Invalid client certificate: {err}")))?;
            builder = builder.identity(identity);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build NSX-T HTTP client: {err}"))
        })?;

        Ok(ServiceClient {
            api,
            http,
            base_url: self.base_url,
            basic_auth: self.basic_auth,
            enable_logging: self.http_config.enable_logging,
        })
    }
}

fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|err| {
        Error::ConfigError(format!("Failed to read {what} {}: {err}", path.display()))
    })
}

/// HTTP client bound to one NSX-T API surface.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    api: NsxtApi,
    http: Client,
    base_url: Url,
    basic_auth: Option<BasicAuth>,
    enable_logging: bool,
}

impl ServiceClient {
    /// Returns the API surface this client targets.
    #[must_use]
    pub const fn api(&self) -> NsxtApi {
        self.api
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path relative to the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid {} path `{path}`: {err}", self.api))
        })
    }

    /// Send one request.
    ///
    /// `configure` adds headers and a body. Non-success statuses are turned into
    /// errors by `map_status`, which receives the status and the response text.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or the error produced by `map_status`.
    pub async fn execute<F, M>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        configure: F,
        map_status: M,
    ) -> Result<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
        M: FnOnce(StatusCode, String) -> Error,
    {
        let url = self.build_url(path)?;
        let mut request = self.http.request(method.clone(), url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(auth) = &self.basic_auth {
            request = request.basic_auth(&auth.username, Some(auth.password.expose_secret()));
        }
        request = configure(request);

        if self.enable_logging {
            debug!(api = %self.api, %method, path = %path, ?params, "Sending NSX-T request");
        }

        let response = request.send().await?;
        let status = response.status();

        if self.enable_logging {
            debug!(api = %self.api, %method, path = %path, status = status.as_u16(), "NSX-T response");
        }

        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(map_status(status, text))
    }
}
