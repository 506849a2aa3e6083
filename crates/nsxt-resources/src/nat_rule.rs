//! NAT rule of a logical router.

use crate::api::NatRuleApi;
use crate::resource::{assigned_id, deleted, found, require_id, Resource};
use async_trait::async_trait;
use nsxt_core::ids::{LogicalRouterId, NatRuleId};
use nsxt_core::models::{ManagedResource, Tag};
use nsxt_core::Result;
use nsxt_manager::{NatAction, NatRule};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

const fn default_true() -> bool {
    true
}

/// NAT rule record.
///
/// Every operation is addressed through `logical_router_id`, which must be
/// set even on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NatRuleResource {
    /// Server-assigned identifier (numeric).
    #[serde(default)]
    pub id: Option<String>,
    /// Revision last read from the server.
    #[serde(default)]
    pub revision: i64,
    /// Display name.
    #[serde(default)]
    #[validate(length(max = 255))]
    pub display_name: Option<String>,
    /// Description.
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub description: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Owning logical router.
    #[validate(length(min = 1))]
    pub logical_router_id: String,
    /// Action. SNAT and DNAT are stateful, REFLEXIVE is stateless.
    pub action: NatAction,
    /// Rule enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Rule logging.
    #[serde(default)]
    pub logging: bool,
    /// Destination match; `None` means any.
    #[serde(default)]
    pub match_destination_network: Option<String>,
    /// Source match; `None` means any.
    #[serde(default)]
    pub match_source_network: Option<String>,
    /// Service match, passed through unchanged.
    #[serde(default)]
    pub match_service: Option<Value>,
    /// Skip the firewall stage on match. Must stay true for NO_NAT.
    #[serde(default = "default_true")]
    pub nat_pass: bool,
    /// Ascending priority, assigned by the server when unset.
    #[serde(default)]
    pub rule_priority: Option<i64>,
    /// Translated address, range or CIDR.
    #[serde(default)]
    pub translated_network: Option<String>,
    /// Translated port or port range (DNAT only).
    #[serde(default)]
    pub translated_ports: Option<String>,
}

impl NatRuleResource {
    /// Create a record for a new rule.
    #[must_use]
    pub fn new(logical_router_id: impl Into<String>, action: NatAction) -> Self {
        Self {
            id: None,
            revision: 0,
            display_name: None,
            description: None,
            tags: Vec::new(),
            logical_router_id: logical_router_id.into(),
            action,
            enabled: true,
            logging: false,
            match_destination_network: None,
            match_source_network: None,
            match_service: None,
            nat_pass: true,
            rule_priority: None,
            translated_network: None,
            translated_ports: None,
        }
    }

    fn router(&self) -> Result<LogicalRouterId> {
        require_id("NatRule logical_router_id", Some(self.logical_router_id.as_str()))
    }

    fn to_rule(&self, revision: Option<i64>) -> NatRule {
        NatRule {
            meta: ManagedResource::new(
                self.display_name.clone(),
                self.description.clone(),
                self.tags.clone(),
            )
            .with_revision(revision),
            action: self.action,
            enabled: self.enabled,
            logging: self.logging,
            logical_router_id: Some(self.logical_router_id.clone()),
            match_destination_network: self.match_destination_network.clone(),
            match_source_network: self.match_source_network.clone(),
            match_service: self.match_service.clone(),
            nat_pass: self.nat_pass,
            rule_priority: self.rule_priority,
            translated_network: self.translated_network.clone(),
            translated_ports: self.translated_ports.clone(),
        }
    }

    fn apply(&mut self, rule: NatRule) {
        self.revision = rule.meta.revision.unwrap_or_default();
        self.display_name = rule.meta.display_name;
        self.description = rule.meta.description;
        self.tags = rule.meta.tags;
        if let Some(router) = rule.logical_router_id {
            self.logical_router_id = router;
        }
        self.action = rule.action;
        self.enabled = rule.enabled;
        self.logging = rule.logging;
        self.match_destination_network = rule.match_destination_network;
        self.match_source_network = rule.match_source_network;
        self.match_service = rule.match_service;
        self.nat_pass = rule.nat_pass;
        self.rule_priority = rule.rule_priority;
        self.translated_network = rule.translated_network;
        self.translated_ports = rule.translated_ports;
    }
}

#[async_trait]
impl Resource for NatRuleResource {
    const KIND: &'static str = "NatRule";
    type Api = dyn NatRuleApi;

    async fn create(&mut self, api: &Self::Api) -> Result<()> {
        let router = self.router()?;
        self.validate()?;

        let created = api
            .add_nat_rule(&router, &self.to_rule(None))
            .await
            .map_err(|err| err.during(Self::KIND, "create"))?;
        self.id = Some(assigned_id(Self::KIND, created.meta.id)?);

        self.read(api).await
    }

    async fn read(&mut self, api: &Self::Api) -> Result<()> {
        let id: NatRuleId = require_id(Self::KIND, self.id.as_deref())?;
        let router = self.router()?;

        let result = api.get_nat_rule(&router, &id).await;
        if let Some(rule) = found(Self::KIND, "read", &mut self.id, result)? {
            self.apply(rule);
        }
        Ok(())
    }

    async fn update(&mut self, api: &Self::Api) -> Result<()> {
        let id: NatRuleId = require_id(Self::KIND, self.id.as_deref())?;
        let router = self.router()?;
        self.validate()?;

        api.update_nat_rule(&router, &id, &self.to_rule(Some(self.revision)))
            .await
            .map_err(|err| err.during(Self::KIND, "update"))?;

        self.read(api).await
    }

    async fn delete(&mut self, api: &Self::Api) -> Result<()> {
        let id: NatRuleId = require_id(Self::KIND, self.id.as_deref())?;
        let router = self.router()?;

        let result = api.delete_nat_rule(&router, &id).await;
        deleted(Self::KIND, &mut self.id, result)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockNatRuleApi;
    use nsxt_core::Error;

    fn record() -> NatRuleResource {
        let mut record = NatRuleResource::new("lr-1", NatAction::Snat);
        record.display_name = Some("snat-web".into());
        record.match_source_network = Some("192.168.1.0/24".into());
        record.translated_network = Some("10.0.0.1".into());
        record
    }

    fn server_rule(revision: i64) -> NatRule {
        let mut rule = record().to_rule(Some(revision));
        rule.meta.id = Some("1026".into());
        rule.rule_priority = Some(1024);
        rule
    }

    #[tokio::test]
    async fn create_stores_id_and_reads_back() {
        let mut api = MockNatRuleApi::new();
        api.expect_add_nat_rule()
            .withf(|router, rule| {
                router.as_str() == "lr-1"
                    && rule.logical_router_id.as_deref() == Some("lr-1")
                    && rule.meta.revision.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(server_rule(0)));
        api.expect_get_nat_rule()
            .withf(|router, id| router.as_str() == "lr-1" && id.as_str() == "1026")
            .returning(|_, _| Ok(server_rule(0)));

        let mut record = record();
        record.create(&api).await.unwrap();

        assert_eq!(record.id.as_deref(), Some("1026"));
        assert_eq!(record.rule_priority, Some(1024));
        assert!(record.enabled);
        assert!(record.nat_pass);
    }

    #[tokio::test]
    async fn create_requires_router() {
        let api = MockNatRuleApi::new();
        let mut record = record();
        record.logical_router_id = String::new();

        let err = record.create(&api).await.unwrap_err();
        assert!(matches!(err, Error::MissingId(_)));
    }

    #[tokio::test]
    async fn read_not_found_clears_id() {
        let mut api = MockNatRuleApi::new();
        api.expect_get_nat_rule()
            .returning(|_, _| Err(Error::NotFound("gone".into())));

        let mut record = record();
        record.id = Some("1026".into());
        record.read(&api).await.unwrap();
        assert!(record.id.is_none());
    }

    #[tokio::test]
    async fn update_sends_revision_and_not_found_fails() {
        let mut api = MockNatRuleApi::new();
        api.expect_update_nat_rule()
            .withf(|_, _, rule| rule.meta.revision == Some(3))
            .times(1)
            .returning(|_, _, _| Err(Error::NotFound("gone".into())));

        let mut record = record();
        record.id = Some("1026".into());
        record.revision = 3;
        let err = record.update(&api).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(record.id.as_deref(), Some("1026"));
    }

    #[tokio::test]
    async fn delete_clears_id() {
        let mut api = MockNatRuleApi::new();
        api.expect_delete_nat_rule()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut record = record();
        record.id = Some("1026".into());
        record.delete(&api).await.unwrap();
        assert!(record.id.is_none());
    }

    #[tokio::test]
    async fn delete_without_id_fails() {
        let api = MockNatRuleApi::new();
        let mut record = record();
        let err = record.delete(&api).await.unwrap_err();
        assert_eq!(err, Error::MissingId("NatRule".into()));
    }

    #[test]
    fn record_defaults() {
        let record: NatRuleResource = serde_json::from_value(serde_json::json!({
            "logical_router_id": "lr-1",
            "action": "NO_NAT"
        }))
        .unwrap();
        assert!(record.enabled);
        assert!(record.nat_pass);
        assert!(!record.logging);
        assert_eq!(record.action, NatAction::NoNat);
    }
}
