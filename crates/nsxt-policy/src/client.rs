//! Asynchronous Policy API client implementation.

use crate::models::{PolicyTransportZoneProfile, SecurityConfigParams, Tier0SecurityFeatures};
use crate::Result;
use nsxt_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder, POLICY_DEFAULT_TIMEOUT};
use nsxt_core::config::NsxtProviderConfig;
use nsxt_core::error::ApiErrorBody;
use nsxt_core::ids::{Tier0Id, TransportZoneProfileId};
use nsxt_core::models::ListResult;
use nsxt_core::query::ListParams;
use nsxt_core::types::NsxtApi;
use nsxt_core::Error;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use url::Url;

const USER_AGENT: &str = concat!("nsxt-policy/", env!("CARGO_PKG_VERSION"));

/// Builder for [`PolicyClient`].
#[derive(Debug, Clone)]
pub struct PolicyClientBuilder {
    inner: ServiceClientBuilder,
}

impl PolicyClientBuilder {
    /// Create a builder for the policy or global manager API on `host`.
    pub fn new(api: NsxtApi, host: impl AsRef<str>) -> Result<Self> {
        ensure_policy(api)?;
        let builder =
            ServiceClientBuilder::new(api, host, Duration::from_secs(POLICY_DEFAULT_TIMEOUT))?
                .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a provider configuration.
    ///
    /// Targets the global manager when the configuration asks for it.
    pub fn from_config(config: &NsxtProviderConfig) -> Result<Self> {
        let builder = ServiceClientBuilder::from_config(config.policy_api(), config)?
            .with_user_agent(USER_AGENT);
        Ok(Self { inner: builder })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.inner = self.inner.with_basic_auth(username, password);
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.inner = self.inner.with_tls_verify(verify);
        self
    }

    /// Trust an additional CA bundle.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.inner = self.inner.with_ca_cert(path);
        self
    }

    /// Authenticate with a client certificate.
    #[must_use]
    pub fn with_client_cert(mut self, cert: PathBuf, key: PathBuf) -> Self {
        self.inner = self.inner.with_client_cert(cert, key);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<PolicyClient> {
        let inner = self.inner.build()?;
        Ok(PolicyClient { inner })
    }
}

fn ensure_policy(api: NsxtApi) -> Result<()> {
    if api.is_policy() {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "PolicyClient cannot target the {api} API"
        )))
    }
}

/// Asynchronous NSX-T Policy API client.
///
/// Object paths are resolved under `infra` on a local manager and under
/// `global-infra` on a global manager.
#[derive(Debug, Clone)]
pub struct PolicyClient {
    inner: ServiceClient,
}

impl PolicyClient {
    /// Construct a client directly from the host URL.
    pub fn new(api: NsxtApi, host: impl AsRef<str>) -> Result<Self> {
        PolicyClientBuilder::new(api, host)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Return the API flavour.
    #[must_use]
    pub fn api(&self) -> NsxtApi {
        self.inner.api()
    }

    fn security_config_path(&self, tier0: &Tier0Id) -> String {
        format!(
            "{}/tier-0s/{tier0}/security-config",
            self.inner.api().infra_root()
        )
    }

    /// Read the security configuration of a tier-0 gateway.
    pub async fn get_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        params: &SecurityConfigParams,
    ) -> Result<Tier0SecurityFeatures> {
        let path = self.security_config_path(tier0);
        self.send_json::<(), Tier0SecurityFeatures>(Method::GET, &path, None, &params.to_pairs())
            .await
    }

    /// Create the security configuration, or merge into an existing one.
    pub async fn patch_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        config: &Tier0SecurityFeatures,
    ) -> Result<Tier0SecurityFeatures> {
        let path = self.security_config_path(tier0);
        let patched: Tier0SecurityFeatures = self
            .send_json(Method::PATCH, &path, Some(config), &[])
            .await?;
        info!(%tier0, "patched tier-0 security config");
        Ok(patched)
    }

    /// Replace the security configuration; the revision must match.
    pub async fn update_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        config: &Tier0SecurityFeatures,
    ) -> Result<Tier0SecurityFeatures> {
        let path = self.security_config_path(tier0);
        self.send_json(Method::PUT, &path, Some(config), &[]).await
    }

    /// Delete the security configuration.
    pub async fn delete_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        params: &SecurityConfigParams,
    ) -> Result<()> {
        let path = self.security_config_path(tier0);
        self.inner
            .execute(
                Method::DELETE,
                &path,
                &params.to_pairs(),
                |request| request,
                map_status_to_error,
            )
            .await?;
        info!(%tier0, "deleted tier-0 security config");
        Ok(())
    }

    /// Fetch a transport-zone profile.
    pub async fn get_transport_zone_profile(
        &self,
        id: &TransportZoneProfileId,
    ) -> Result<PolicyTransportZoneProfile> {
        let path = format!(
            "{}/transport-zone-profiles/{id}",
            self.inner.api().infra_root()
        );
        self.send_json::<(), PolicyTransportZoneProfile>(Method::GET, &path, None, &[])
            .await
    }

    /// List one page of transport-zone profiles.
    pub async fn list_transport_zone_profiles(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<PolicyTransportZoneProfile>> {
        let path = format!("{}/transport-zone-profiles", self.inner.api().infra_root());
        self.send_json::<(), ListResult<PolicyTransportZoneProfile>>(
            Method::GET,
            &path,
            None,
            &params.to_pairs(),
        )
        .await
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&'static str, String)],
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .execute(
                method,
                path,
                params,
                |mut request| {
                    request = request.header("Accept", "application/json");
                    if let Some(payload) = body {
                        request = request.json(payload);
                    }
                    request
                },
                map_status_to_error,
            )
            .await?;

        response.json::<R>().await.map_err(Error::from)
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    let text = ApiErrorBody::describe(&text);
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::InvalidRequest(format!("NSX-T policy authentication failed: {text}"))
        }
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("NSX-T policy temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("NSX-T policy server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("NSX-T policy error {status}: {text}")),
    }
}
