//! Provider wiring: one configuration, one client per API surface.

use nsxt_core::config::NsxtProviderConfig;
use nsxt_core::types::NsxtApi;
use nsxt_core::Result;
use nsxt_manager::{ManagerClient, ManagerClientBuilder};
use nsxt_policy::{PolicyClient, PolicyClientBuilder};
use tracing::info;
use validator::Validate;

/// Configured NSX-T clients shared by every resource handler.
///
/// Manager API resources take [`NsxtProvider::manager`]; policy resources take
/// [`NsxtProvider::policy`], which targets the global manager when the
/// configuration says so.
#[derive(Debug, Clone)]
pub struct NsxtProvider {
    manager: ManagerClient,
    policy: PolicyClient,
}

impl NsxtProvider {
    /// Build both clients from a configuration.
    pub fn from_config(config: &NsxtProviderConfig) -> Result<Self> {
        config.validate()?;

        let manager = ManagerClientBuilder::from_config(config)?.build()?;
        let policy = PolicyClientBuilder::from_config(config)?.build()?;
        info!(
            host = %config.host,
            policy_api = %config.policy_api(),
            "configured NSX-T provider"
        );

        Ok(Self { manager, policy })
    }

    /// Build both clients from the `NSXT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&NsxtProviderConfig::from_env()?)
    }

    /// Manager API client.
    #[must_use]
    pub fn manager(&self) -> &ManagerClient {
        &self.manager
    }

    /// Policy or global manager API client.
    #[must_use]
    pub fn policy(&self) -> &PolicyClient {
        &self.policy
    }

    /// Returns the API flavour of the policy client.
    #[must_use]
    pub fn policy_api(&self) -> NsxtApi {
        self.policy.api()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsxt_core::Error;

    #[test]
    fn from_config_builds_both_clients() {
        let config = NsxtProviderConfig::new("nsx.example.com", "admin", "secret").unwrap();
        let provider = NsxtProvider::from_config(&config).unwrap();

        assert_eq!(
            provider.manager().base_url().as_str(),
            "https://nsx.example.com/api/v1/"
        );
        assert_eq!(
            provider.policy().base_url().as_str(),
            "https://nsx.example.com/policy/api/v1/"
        );
        assert_eq!(provider.policy_api(), NsxtApi::Policy);
    }

    #[test]
    fn global_manager_switches_policy_client() {
        let config = NsxtProviderConfig::new("https://gm.example.com:8443", "admin", "secret")
            .unwrap()
            .with_global_manager(true);
        let provider = NsxtProvider::from_config(&config).unwrap();

        assert_eq!(provider.policy_api(), NsxtApi::GlobalPolicy);
        assert_eq!(
            provider.policy().base_url().as_str(),
            "https://gm.example.com:8443/global-manager/api/v1/"
        );
        assert_eq!(
            provider.manager().base_url().as_str(),
            "https://gm.example.com:8443/api/v1/"
        );
    }

    #[test]
    fn from_config_revalidates() {
        let mut config = NsxtProviderConfig::new("nsx.example.com", "admin", "secret").unwrap();
        config.request_timeout_secs = 0;
        let err = NsxtProvider::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }
}
