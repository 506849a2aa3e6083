//! Configuration structures for NSX-T clients.
//!
//! This module provides the provider-level configuration: manager host,
//! credentials, TLS settings and timeouts. It can be loaded from the
//! environment variables used by the NSX-T tooling.

use crate::types::NsxtApi;
use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use validator::{Validate, ValidationError};

/// Environment variable holding the manager host.
pub const ENV_MANAGER_HOST: &str = "NSXT_MANAGER_HOST";
/// Environment variable holding the user name.
pub const ENV_USERNAME: &str = "NSXT_USERNAME";
/// Environment variable holding the password.
pub const ENV_PASSWORD: &str = "NSXT_PASSWORD";
/// Environment variable disabling certificate verification.
pub const ENV_ALLOW_UNVERIFIED_SSL: &str = "NSXT_ALLOW_UNVERIFIED_SSL";
/// Environment variable holding a CA bundle path.
pub const ENV_CA_FILE: &str = "NSXT_CA_FILE";
/// Environment variable holding a client certificate path.
pub const ENV_CLIENT_AUTH_CERT_FILE: &str = "NSXT_CLIENT_AUTH_CERT_FILE";
/// Environment variable holding a client key path.
pub const ENV_CLIENT_AUTH_KEY_FILE: &str = "NSXT_CLIENT_AUTH_KEY_FILE";
/// Environment variable selecting the Global Manager.
pub const ENV_GLOBAL_MANAGER: &str = "NSXT_GLOBAL_MANAGER";
/// Environment variable holding the request timeout in seconds.
pub const ENV_REQUEST_TIMEOUT: &str = "NSXT_REQUEST_TIMEOUT";

/// Configuration for an NSX-T provider instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_credentials"))]
pub struct NsxtProviderConfig {
    /// Manager host name or URL; `https://` is assumed when no scheme is given
    #[validate(custom(function = "validate_host"))]
    pub host: String,

    /// User name for basic authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password for basic authentication; never serialised or printed
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub allow_unverified_ssl: bool,

    /// Optional path to a custom CA bundle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<PathBuf>,

    /// Optional client certificate (PEM)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_auth_cert_file: Option<PathBuf>,

    /// Optional client private key (PEM)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_auth_key_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Target the Global Manager policy API
    #[serde(default)]
    pub global_manager: bool,
}

const fn default_request_timeout_secs() -> u64 {
    30
}

#[allow(clippy::ptr_arg)]
fn validate_host(host: &String) -> Result<(), ValidationError> {
    normalize_host(host)
        .map(|_| ())
        .map_err(|_| ValidationError::new("host"))
}

fn validate_credentials(config: &NsxtProviderConfig) -> Result<(), ValidationError> {
    let basic = config.username.is_some() && config.password.is_some();
    let cert = config.client_auth_cert_file.is_some() && config.client_auth_key_file.is_some();

    if config.client_auth_cert_file.is_some() != config.client_auth_key_file.is_some() {
        return Err(ValidationError::new("client_auth_requires_cert_and_key"));
    }
    if !basic && !cert {
        return Err(ValidationError::new("missing_credentials"));
    }
    Ok(())
}

fn normalize_host(host: &str) -> Result<Url, Error> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::ConfigError("NSX-T manager host is empty".to_string()));
    }

    let candidate = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| Error::ConfigError(format!("Invalid NSX-T manager host: {e}")))?;
    if url.host_str().is_none() {
        return Err(Error::ConfigError(format!(
            "NSX-T manager host has no host name: {host}"
        )));
    }
    Ok(url)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Error> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(Error::ConfigError(format!(
            "{key} must be a boolean, got `{other}`"
        ))),
    }
}

impl NsxtProviderConfig {
    /// Create a configuration using basic authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is invalid or validation fails.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        let config = Self {
            host: host.into(),
            username: Some(username.into()),
            password: Some(SecretString::from(password.into())),
            allow_unverified_ssl: false,
            ca_file: None,
            client_auth_cert_file: None,
            client_auth_key_file: None,
            request_timeout_secs: default_request_timeout_secs(),
            global_manager: false,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or validation fails.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or validation fails.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(ENV_MANAGER_HOST)
            .ok_or_else(|| Error::ConfigError(format!("{ENV_MANAGER_HOST} is not set")))?;

        let allow_unverified_ssl = lookup(ENV_ALLOW_UNVERIFIED_SSL)
            .map(|v| parse_bool(ENV_ALLOW_UNVERIFIED_SSL, &v))
            .transpose()?
            .unwrap_or(false);

        let global_manager = lookup(ENV_GLOBAL_MANAGER)
            .map(|v| parse_bool(ENV_GLOBAL_MANAGER, &v))
            .transpose()?
            .unwrap_or(false);

        let request_timeout_secs = lookup(ENV_REQUEST_TIMEOUT)
            .map(|v| {
                v.trim().parse::<u64>().map_err(|e| {
                    Error::ConfigError(format!("{ENV_REQUEST_TIMEOUT} must be an integer: {e}"))
                })
            })
            .transpose()?
            .unwrap_or_else(default_request_timeout_secs);

        let config = Self {
            host,
            username: lookup(ENV_USERNAME),
            password: lookup(ENV_PASSWORD).map(SecretString::from),
            allow_unverified_ssl,
            ca_file: lookup(ENV_CA_FILE).map(PathBuf::from),
            client_auth_cert_file: lookup(ENV_CLIENT_AUTH_CERT_FILE).map(PathBuf::from),
            client_auth_key_file: lookup(ENV_CLIENT_AUTH_KEY_FILE).map(PathBuf::from),
            request_timeout_secs,
            global_manager,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Skip TLS certificate verification.
    #[must_use]
    pub const fn with_allow_unverified_ssl(mut self, allow: bool) -> Self {
        self.allow_unverified_ssl = allow;
        self
    }

    /// Set custom CA bundle path.
    #[must_use]
    pub fn with_ca_file(mut self, path: PathBuf) -> Self {
        self.ca_file = Some(path);
        self
    }

    /// Authenticate with a client certificate and key.
    #[must_use]
    pub fn with_client_auth(mut self, cert: PathBuf, key: PathBuf) -> Self {
        self.client_auth_cert_file = Some(cert);
        self.client_auth_key_file = Some(key);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Target the Global Manager.
    #[must_use]
    pub const fn with_global_manager(mut self, global: bool) -> Self {
        self.global_manager = global;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the policy API flavour selected by this configuration.
    #[must_use]
    pub const fn policy_api(&self) -> NsxtApi {
        if self.global_manager {
            NsxtApi::GlobalPolicy
        } else {
            NsxtApi::Policy
        }
    }

    /// Parse the manager host into a URL, assuming `https://` when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be parsed.
    pub fn manager_url(&self) -> Result<Url, Error> {
        normalize_host(&self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_new() {
        let config = NsxtProviderConfig::new("nsx.example.com", "admin", "secret").unwrap();
        assert_eq!(config.host, "nsx.example.com");
        assert!(!config.allow_unverified_ssl);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.policy_api(), NsxtApi::Policy);
    }

    #[test]
    fn test_manager_url_assumes_https() {
        let config = NsxtProviderConfig::new("nsx.example.com", "admin", "secret").unwrap();
        let url = config.manager_url().unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("nsx.example.com"));

        let config = NsxtProviderConfig::new("http://10.0.0.5:8080", "admin", "secret").unwrap();
        let url = config.manager_url().unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_config_invalid_host() {
        assert!(NsxtProviderConfig::new("", "admin", "secret").is_err());
        assert!(NsxtProviderConfig::new("https://", "admin", "secret").is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = NsxtProviderConfig::new("nsx.example.com", "admin", "secret")
            .unwrap()
            .with_allow_unverified_ssl(true)
            .with_ca_file(PathBuf::from("/etc/nsx/ca.pem"))
            .with_timeout(60)
            .with_global_manager(true);

        assert!(config.allow_unverified_ssl);
        assert_eq!(config.ca_file, Some(PathBuf::from("/etc/nsx/ca.pem")));
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.policy_api(), NsxtApi::GlobalPolicy);
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = NsxtProviderConfig::new("nsx.example.com", "admin", "secret").unwrap();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 301;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_credentials() {
        let mut config = NsxtProviderConfig::new("nsx.example.com", "admin", "secret").unwrap();
        config.password = None;
        assert!(config.validate().is_err());

        let config = config.with_client_auth(
            PathBuf::from("/etc/nsx/client.pem"),
            PathBuf::from("/etc/nsx/client.key"),
        );
        assert!(config.validate().is_ok());

        let mut half = config;
        half.client_auth_key_file = None;
        assert!(half.validate().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = NsxtProviderConfig::from_lookup(lookup_from(&[
            (ENV_MANAGER_HOST, "nsx.lab.local"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "VMware1!"),
            (ENV_ALLOW_UNVERIFIED_SSL, "true"),
            (ENV_GLOBAL_MANAGER, "0"),
            (ENV_REQUEST_TIMEOUT, "45"),
        ]))
        .unwrap();

        assert_eq!(config.host, "nsx.lab.local");
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert!(config.allow_unverified_ssl);
        assert!(!config.global_manager);
        assert_eq!(config.request_timeout_secs, 45);
    }

    #[test]
    fn test_from_lookup_missing_host() {
        let err = NsxtProviderConfig::from_lookup(lookup_from(&[(ENV_USERNAME, "admin")]))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_from_lookup_bad_bool() {
        let err = NsxtProviderConfig::from_lookup(lookup_from(&[
            (ENV_MANAGER_HOST, "nsx.lab.local"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "secret"),
            (ENV_ALLOW_UNVERIFIED_SSL, "maybe"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(ENV_ALLOW_UNVERIFIED_SSL));
    }

    #[test]
    fn test_password_is_not_serialized() {
        let config = NsxtProviderConfig::new("nsx.example.com", "admin", "secret").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("nsx.example.com"));
    }

    #[test]
    fn test_password_is_not_printed() {
        let config = NsxtProviderConfig::new("nsx.example.com", "admin", "VMware1!").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("VMware1!"));
        assert!(debug.contains("admin"));
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: NsxtProviderConfig = serde_json::from_str(
            r#"{"host": "nsx.example.com", "username": "admin", "password": "pw"}"#,
        )
        .unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.global_manager);
        assert_eq!(
            config.password.as_ref().map(|p| p.expose_secret()),
            Some("pw")
        );
        assert!(config.validate().is_ok());
    }
}
