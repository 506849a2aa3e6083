//! Asynchronous Manager API client implementation.

use crate::models::{
    FirewallSection, FirewallSectionRuleList, L4PortSetNsService, NatRule,
};
use crate::Result;
use nsxt_core::client::{ClientConfig, ServiceClient, ServiceClientBuilder, MANAGER_DEFAULT_TIMEOUT};
use nsxt_core::config::NsxtProviderConfig;
use nsxt_core::error::ApiErrorBody;
use nsxt_core::ids::{LogicalRouterId, NatRuleId, NsServiceId, RuleId, SectionId};
use nsxt_core::types::NsxtApi;
use nsxt_core::Error;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use url::Url;

const USER_AGENT: &str = concat!("nsxt-manager/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ManagerClient`].
#[derive(Debug, Clone)]
pub struct ManagerClientBuilder {
    inner: ServiceClientBuilder,
}

impl ManagerClientBuilder {
    /// Create a builder for the specified manager host URL.
    pub fn new(host: impl AsRef<str>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            NsxtApi::Manager,
            host,
            Duration::from_secs(MANAGER_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a provider configuration.
    pub fn from_config(config: &NsxtProviderConfig) -> Result<Self> {
        let builder =
            ServiceClientBuilder::from_config(NsxtApi::Manager, config)?.with_user_agent(USER_AGENT);
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
    pub fn build(self) -> Result<ManagerClient> {
        let inner = self.inner.build()?;
        Ok(ManagerClient { inner })
    }
}

/// Asynchronous NSX-T Manager API client.
#[derive(Debug, Clone)]
pub struct ManagerClient {
    inner: ServiceClient,
}

impl ManagerClient {
    /// Construct a client directly from the host URL.
    pub fn new(host: impl AsRef<str>) -> Result<Self> {
        ManagerClientBuilder::new(host)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    // Firewall sections

    /// Create a firewall section without rules.
    pub async fn add_section(&self, section: &FirewallSection) -> Result<FirewallSection> {
        let created: FirewallSection = self
            .create_json("firewall/sections", section, &[])
            .await?;
        info!(id = ?created.meta.id, "created firewall section");
        Ok(created)
    }

    /// Create a firewall section together with its rules.
    pub async fn add_section_with_rules(
        &self,
        section: &FirewallSectionRuleList,
    ) -> Result<FirewallSectionRuleList> {
        let created: FirewallSectionRuleList = self
            .create_json(
                "firewall/sections",
                section,
                &[("action", "create_with_rules".to_string())],
            )
            .await?;
        info!(id = ?created.section.meta.id, rules = created.rules.len(), "created firewall section");
        Ok(created)
    }

    /// Fetch a firewall section without its rules.
    pub async fn get_section(&self, id: &SectionId) -> Result<FirewallSection> {
        let path = format!("firewall/sections/{id}");
        self.send_json::<(), FirewallSection>(Method::GET, &path, None, &[])
            .await
    }

    /// Fetch a firewall section together with its rules.
    pub async fn get_section_with_rules(&self, id: &SectionId) -> Result<FirewallSectionRuleList> {
        let path = format!("firewall/sections/{id}");
        self.send_json::<(), FirewallSectionRuleList>(
            Method::POST,
            &path,
            None,
            &[("action", "list_with_rules".to_string())],
        )
        .await
    }

    /// Update a firewall section, leaving its rules untouched.
    pub async fn update_section(
        &self,
        id: &SectionId,
        section: &FirewallSection,
    ) -> Result<FirewallSection> {
        let path = format!("firewall/sections/{id}");
        self.send_json(Method::PUT, &path, Some(section), &[]).await
    }

    /// Replace a firewall section and all of its rules.
    pub async fn update_section_with_rules(
        &self,
        id: &SectionId,
        section: &FirewallSectionRuleList,
    ) -> Result<FirewallSectionRuleList> {
        let path = format!("firewall/sections/{id}");
        self.send_json(
            Method::POST,
            &path,
            Some(section),
            &[("action", "update_with_rules".to_string())],
        )
        .await
    }

    /// Delete a firewall section; `cascade` also deletes its rules.
    pub async fn delete_section(&self, id: &SectionId, cascade: bool) -> Result<()> {
        let path = format!("firewall/sections/{id}");
        let params = if cascade {
            vec![("cascade", "true".to_string())]
        } else {
            Vec::new()
        };
        self.delete(&path, &params).await?;
        info!(%id, "deleted firewall section");
        Ok(())
    }

    /// Delete one rule from a firewall section.
    pub async fn delete_rule(&self, section: &SectionId, rule: &RuleId) -> Result<()> {
        let path = format!("firewall/sections/{section}/rules/{rule}");
        self.delete(&path, &[]).await
    }

    // NAT rules

    /// Create a NAT rule on a logical router.
    pub async fn add_nat_rule(&self, router: &LogicalRouterId, rule: &NatRule) -> Result<NatRule> {
        let path = format!("logical-routers/{router}/nat/rules");
        let created: NatRule = self.create_json(&path, rule, &[]).await?;
        info!(%router, id = ?created.meta.id, "created NAT rule");
        Ok(created)
    }

    /// Fetch a NAT rule.
    pub async fn get_nat_rule(&self, router: &LogicalRouterId, id: &NatRuleId) -> Result<NatRule> {
        let path = format!("logical-routers/{router}/nat/rules/{id}");
        self.send_json::<(), NatRule>(Method::GET, &path, None, &[])
            .await
    }

    /// Update a NAT rule.
    pub async fn update_nat_rule(
        &self,
        router: &LogicalRouterId,
        id: &NatRuleId,
        rule: &NatRule,
    ) -> Result<NatRule> {
        let path = format!("logical-routers/{router}/nat/rules/{id}");
        self.send_json(Method::PUT, &path, Some(rule), &[]).await
    }

    /// Delete a NAT rule.
    pub async fn delete_nat_rule(&self, router: &LogicalRouterId, id: &NatRuleId) -> Result<()> {
        let path = format!("logical-routers/{router}/nat/rules/{id}");
        self.delete(&path, &[]).await?;
        info!(%router, %id, "deleted NAT rule");
        Ok(())
    }

    // NS services

    /// Create an L4 port-set NS service.
    pub async fn create_l4_port_set_ns_service(
        &self,
        service: &L4PortSetNsService,
    ) -> Result<L4PortSetNsService> {
        let created: L4PortSetNsService = self.create_json("ns-services", service, &[]).await?;
        info!(id = ?created.meta.id, "created NS service");
        Ok(created)
    }

    /// Fetch an L4 port-set NS service.
    pub async fn read_l4_port_set_ns_service(&self, id: &NsServiceId) -> Result<L4PortSetNsService> {
        let path = format!("ns-services/{id}");
        self.send_json::<(), L4PortSetNsService>(Method::GET, &path, None, &[])
            .await
    }

    /// Update an L4 port-set NS service.
    pub async fn update_l4_port_set_ns_service(
        &self,
        id: &NsServiceId,
        service: &L4PortSetNsService,
    ) -> Result<L4PortSetNsService> {
        let path = format!("ns-services/{id}");
        self.send_json(Method::PUT, &path, Some(service), &[]).await
    }

    /// Delete an NS service of any kind.
    pub async fn delete_ns_service(&self, id: &NsServiceId) -> Result<()> {
        let path = format!("ns-services/{id}");
        self.delete(&path, &[]).await?;
        info!(%id, "deleted NS service");
        Ok(())
    }

    async fn delete(&self, path: &str, params: &[(&'static str, String)]) -> Result<()> {
        self.inner
            .execute(
                Method::DELETE,
                path,
                params,
                |request| request,
                map_status_to_error,
            )
            .await
            .map(|_| ())
    }

    /// POST a body and require `201 Created`.
    async fn create_json<B, R>(
        &self,
        path: &str,
        body: &B,
        params: &[(&'static str, String)],
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .execute(
                Method::POST,
                path,
                params,
                |request| request.header("Accept", "application/json").json(body),
                map_status_to_error,
            )
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                message: format!("expected 201 Created from POST {path}"),
            });
        }

        response.json::<R>().await.map_err(Error::from)
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
            Error::InvalidRequest(format!("NSX-T manager authentication failed: {text}"))
        }
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("NSX-T manager temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("NSX-T manager server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("NSX-T manager error {status}: {text}")),
    }
}
