//! Remote API seams used by the resource handlers.
//!
//! Each trait lists the calls one resource needs. The typed clients implement
//! them by delegation, and tests substitute generated mocks.

use async_trait::async_trait;
use nsxt_core::ids::{
    LogicalRouterId, NatRuleId, NsServiceId, RuleId, SectionId, Tier0Id, TransportZoneProfileId,
};
use nsxt_core::models::ListResult;
use nsxt_core::query::ListParams;
use nsxt_core::Result;
use nsxt_manager::{
    FirewallSection, FirewallSectionRuleList, L4PortSetNsService, ManagerClient, NatRule,
};
use nsxt_policy::{
    PolicyClient, PolicyTransportZoneProfile, SecurityConfigParams, Tier0SecurityFeatures,
};

/// Firewall section calls of the Manager API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FirewallSectionApi: Send + Sync {
    /// `POST firewall/sections`
    async fn add_section(&self, section: &FirewallSection) -> Result<FirewallSection>;

    /// `POST firewall/sections?action=create_with_rules`
    async fn add_section_with_rules(
        &self,
        section: &FirewallSectionRuleList,
    ) -> Result<FirewallSectionRuleList>;

    /// `GET firewall/sections/{id}`
    async fn get_section(&self, id: &SectionId) -> Result<FirewallSection>;

    /// `POST firewall/sections/{id}?action=list_with_rules`
    async fn get_section_with_rules(&self, id: &SectionId) -> Result<FirewallSectionRuleList>;

    /// `PUT firewall/sections/{id}`
    async fn update_section(
        &self,
        id: &SectionId,
        section: &FirewallSection,
    ) -> Result<FirewallSection>;

    /// `POST firewall/sections/{id}?action=update_with_rules`
    async fn update_section_with_rules(
        &self,
        id: &SectionId,
        section: &FirewallSectionRuleList,
    ) -> Result<FirewallSectionRuleList>;

    /// `DELETE firewall/sections/{id}`
    async fn delete_section(&self, id: &SectionId, cascade: bool) -> Result<()>;

    /// `DELETE firewall/sections/{section}/rules/{rule}`
    async fn delete_rule(&self, section: &SectionId, rule: &RuleId) -> Result<()>;
}

/// NAT rule calls of the Manager API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NatRuleApi: Send + Sync {
    /// `POST logical-routers/{router}/nat/rules`
    async fn add_nat_rule(&self, router: &LogicalRouterId, rule: &NatRule) -> Result<NatRule>;

    /// `GET logical-routers/{router}/nat/rules/{id}`
    async fn get_nat_rule(&self, router: &LogicalRouterId, id: &NatRuleId) -> Result<NatRule>;

    /// `PUT logical-routers/{router}/nat/rules/{id}`
    async fn update_nat_rule(
        &self,
        router: &LogicalRouterId,
        id: &NatRuleId,
        rule: &NatRule,
    ) -> Result<NatRule>;

    /// `DELETE logical-routers/{router}/nat/rules/{id}`
    async fn delete_nat_rule(&self, router: &LogicalRouterId, id: &NatRuleId) -> Result<()>;
}

/// NS service calls of the Manager API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NsServiceApi: Send + Sync {
    /// `POST ns-services`
    async fn create_l4_port_set_ns_service(
        &self,
        service: &L4PortSetNsService,
    ) -> Result<L4PortSetNsService>;

    /// `GET ns-services/{id}`
    async fn read_l4_port_set_ns_service(&self, id: &NsServiceId) -> Result<L4PortSetNsService>;

    /// `PUT ns-services/{id}`
    async fn update_l4_port_set_ns_service(
        &self,
        id: &NsServiceId,
        service: &L4PortSetNsService,
    ) -> Result<L4PortSetNsService>;

    /// `DELETE ns-services/{id}`
    async fn delete_ns_service(&self, id: &NsServiceId) -> Result<()>;
}

/// Tier-0 security configuration calls of the Policy API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Tier0SecurityConfigApi: Send + Sync {
    /// `GET {infra}/tier-0s/{id}/security-config`
    async fn get_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        params: &SecurityConfigParams,
    ) -> Result<Tier0SecurityFeatures>;

    /// `PATCH {infra}/tier-0s/{id}/security-config`
    async fn patch_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        config: &Tier0SecurityFeatures,
    ) -> Result<Tier0SecurityFeatures>;

    /// `PUT {infra}/tier-0s/{id}/security-config`
    async fn update_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        config: &Tier0SecurityFeatures,
    ) -> Result<Tier0SecurityFeatures>;

    /// `DELETE {infra}/tier-0s/{id}/security-config`
    async fn delete_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        params: &SecurityConfigParams,
    ) -> Result<()>;
}

/// Transport-zone profile calls of the Policy API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransportZoneProfileApi: Send + Sync {
    /// `GET {infra}/transport-zone-profiles/{id}`
    async fn get_transport_zone_profile(
        &self,
        id: &TransportZoneProfileId,
    ) -> Result<PolicyTransportZoneProfile>;

    /// `GET {infra}/transport-zone-profiles`
    async fn list_transport_zone_profiles(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<PolicyTransportZoneProfile>>;
}

#[async_trait]
impl FirewallSectionApi for ManagerClient {
    async fn add_section(&self, section: &FirewallSection) -> Result<FirewallSection> {
        ManagerClient::add_section(self, section).await
    }

    async fn add_section_with_rules(
        &self,
        section: &FirewallSectionRuleList,
    ) -> Result<FirewallSectionRuleList> {
        ManagerClient::add_section_with_rules(self, section).await
    }

    async fn get_section(&self, id: &SectionId) -> Result<FirewallSection> {
        ManagerClient::get_section(self, id).await
    }

    async fn get_section_with_rules(&self, id: &SectionId) -> Result<FirewallSectionRuleList> {
        ManagerClient::get_section_with_rules(self, id).await
    }

    async fn update_section(
        &self,
        id: &SectionId,
        section: &FirewallSection,
    ) -> Result<FirewallSection> {
        ManagerClient::update_section(self, id, section).await
    }

    async fn update_section_with_rules(
        &self,
        id: &SectionId,
        section: &FirewallSectionRuleList,
    ) -> Result<FirewallSectionRuleList> {
        ManagerClient::update_section_with_rules(self, id, section).await
    }

    async fn delete_section(&self, id: &SectionId, cascade: bool) -> Result<()> {
        ManagerClient::delete_section(self, id, cascade).await
    }

    async fn delete_rule(&self, section: &SectionId, rule: &RuleId) -> Result<()> {
        ManagerClient::delete_rule(self, section, rule).await
    }
}

#[async_trait]
impl NatRuleApi for ManagerClient {
    async fn add_nat_rule(&self, router: &LogicalRouterId, rule: &NatRule) -> Result<NatRule> {
        ManagerClient::add_nat_rule(self, router, rule).await
    }

    async fn get_nat_rule(&self, router: &LogicalRouterId, id: &NatRuleId) -> Result<NatRule> {
        ManagerClient::get_nat_rule(self, router, id).await
    }

    async fn update_nat_rule(
        &self,
        router: &LogicalRouterId,
        id: &NatRuleId,
        rule: &NatRule,
    ) -> Result<NatRule> {
        ManagerClient::update_nat_rule(self, router, id, rule).await
    }

    async fn delete_nat_rule(&self, router: &LogicalRouterId, id: &NatRuleId) -> Result<()> {
        ManagerClient::delete_nat_rule(self, router, id).await
    }
}

#[async_trait]
impl NsServiceApi for ManagerClient {
    async fn create_l4_port_set_ns_service(
        &self,
        service: &L4PortSetNsService,
    ) -> Result<L4PortSetNsService> {
        ManagerClient::create_l4_port_set_ns_service(self, service).await
    }

    async fn read_l4_port_set_ns_service(&self, id: &NsServiceId) -> Result<L4PortSetNsService> {
        ManagerClient::read_l4_port_set_ns_service(self, id).await
    }

    async fn update_l4_port_set_ns_service(
        &self,
        id: &NsServiceId,
        service: &L4PortSetNsService,
    ) -> Result<L4PortSetNsService> {
        ManagerClient::update_l4_port_set_ns_service(self, id, service).await
    }

    async fn delete_ns_service(&self, id: &NsServiceId) -> Result<()> {
        ManagerClient::delete_ns_service(self, id).await
    }
}

#[async_trait]
impl Tier0SecurityConfigApi for PolicyClient {
    async fn get_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        params: &SecurityConfigParams,
    ) -> Result<Tier0SecurityFeatures> {
        PolicyClient::get_tier0_security_config(self, tier0, params).await
    }

    async fn patch_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        config: &Tier0SecurityFeatures,
    ) -> Result<Tier0SecurityFeatures> {
        PolicyClient::patch_tier0_security_config(self, tier0, config).await
    }

    async fn update_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        config: &Tier0SecurityFeatures,
    ) -> Result<Tier0SecurityFeatures> {
        PolicyClient::update_tier0_security_config(self, tier0, config).await
    }

    async fn delete_tier0_security_config(
        &self,
        tier0: &Tier0Id,
        params: &SecurityConfigParams,
    ) -> Result<()> {
        PolicyClient::delete_tier0_security_config(self, tier0, params).await
    }
}

#[async_trait]
impl TransportZoneProfileApi for PolicyClient {
    async fn get_transport_zone_profile(
        &self,
        id: &TransportZoneProfileId,
    ) -> Result<PolicyTransportZoneProfile> {
        PolicyClient::get_transport_zone_profile(self, id).await
    }

    async fn list_transport_zone_profiles(
        &self,
        params: &ListParams,
    ) -> Result<ListResult<PolicyTransportZoneProfile>> {
        PolicyClient::list_transport_zone_profiles(self, params).await
    }
}
