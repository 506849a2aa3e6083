//! Distributed firewall section with its rules.

use crate::api::FirewallSectionApi;
use crate::resource::{
    assigned_id, deleted, found, require_id, validate_references, Resource,
    APPLIED_TO_TARGET_TYPES, ENDPOINT_TARGET_TYPES, SERVICE_TARGET_TYPES,
};
use async_trait::async_trait;
use nsxt_core::ids::{RuleId, SectionId};
use nsxt_core::models::{ManagedResource, ResourceReference, Tag};
use nsxt_core::Result;
use nsxt_manager::{
    FirewallRule, FirewallSection, FirewallSectionRuleList, FirewallService, IpProtocol,
    RuleAction, RuleDirection, SectionType,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// One rule of a [`FirewallSectionResource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FirewallRuleConfig {
    /// Server-assigned identifier.
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
    /// Action.
    pub action: RuleAction,
    /// Enforcement points; the section level list takes precedence.
    #[serde(default)]
    pub applied_to: Vec<ResourceReference>,
    /// Sources; empty means any.
    #[serde(default)]
    pub source: Vec<ResourceReference>,
    /// Negate the sources.
    #[serde(default)]
    pub sources_excluded: bool,
    /// Destinations; empty means any.
    #[serde(default)]
    pub destination: Vec<ResourceReference>,
    /// Negate the destinations.
    #[serde(default)]
    pub destinations_excluded: bool,
    /// Services; empty means any.
    #[serde(default)]
    pub service: Vec<ResourceReference>,
    /// Direction for stateless sections.
    #[serde(default)]
    pub direction: Option<RuleDirection>,
    /// Persisted but never realized.
    #[serde(default)]
    pub disabled: bool,
    /// IP protocol.
    #[serde(default)]
    pub ip_protocol: Option<IpProtocol>,
    /// Packet logging.
    #[serde(default)]
    pub logged: bool,
    /// User notes.
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub notes: Option<String>,
    /// Tag printed in CLI output and packet logs.
    #[serde(default)]
    #[validate(length(max = 32))]
    pub rule_tag: Option<String>,
}

impl FirewallRuleConfig {
    /// Create a rule with the given action.
    #[must_use]
    pub fn new(action: RuleAction) -> Self {
        Self {
            id: None,
            revision: 0,
            display_name: None,
            description: None,
            action,
            applied_to: Vec::new(),
            source: Vec::new(),
            sources_excluded: false,
            destination: Vec::new(),
            destinations_excluded: false,
            service: Vec::new(),
            direction: None,
            disabled: false,
            ip_protocol: None,
            logged: false,
            notes: None,
            rule_tag: None,
        }
    }

    fn check_references(&self) -> Result<()> {
        validate_references("rule applied_to", &self.applied_to, APPLIED_TO_TARGET_TYPES)?;
        validate_references("rule source", &self.source, ENDPOINT_TARGET_TYPES)?;
        validate_references("rule destination", &self.destination, ENDPOINT_TARGET_TYPES)?;
        validate_references("rule service", &self.service, SERVICE_TARGET_TYPES)
    }

    fn to_rule(&self) -> FirewallRule {
        let mut meta = ManagedResource::new(
            self.display_name.clone(),
            self.description.clone(),
            Vec::new(),
        );
        if self.id.is_some() {
            meta.id.clone_from(&self.id);
            meta.revision = Some(self.revision);
        }

        FirewallRule {
            meta,
            action: self.action,
            applied_tos: self.applied_to.clone(),
            sources: self.source.clone(),
            sources_excluded: self.sources_excluded,
            destinations: self.destination.clone(),
            destinations_excluded: self.destinations_excluded,
            services: self
                .service
                .iter()
                .cloned()
                .map(FirewallService::from)
                .collect(),
            direction: self.direction,
            disabled: self.disabled,
            ip_protocol: self.ip_protocol,
            logged: self.logged,
            notes: self.notes.clone(),
            rule_tag: self.rule_tag.clone(),
            section_id: None,
        }
    }

    fn from_rule(rule: &FirewallRule) -> Self {
        Self {
            id: rule.meta.id.clone(),
            revision: rule.meta.revision.unwrap_or_default(),
            display_name: rule.meta.display_name.clone(),
            description: rule.meta.description.clone(),
            action: rule.action,
            applied_to: rule.applied_tos.clone(),
            source: rule.sources.clone(),
            sources_excluded: rule.sources_excluded,
            destination: rule.destinations.clone(),
            destinations_excluded: rule.destinations_excluded,
            service: rule
                .services
                .iter()
                .map(|service| service.reference.clone())
                .collect(),
            direction: rule.direction,
            disabled: rule.disabled,
            ip_protocol: rule.ip_protocol,
            logged: rule.logged,
            notes: rule.notes.clone(),
            rule_tag: rule.rule_tag.clone(),
        }
    }
}

/// Firewall section record.
///
/// A section without rules is created and updated through the plain section
/// endpoints; updating it to an empty rule list deletes the rules that remain
/// on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FirewallSectionResource {
    /// Server-assigned identifier.
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
    /// Whether this is a default section (read-only).
    #[serde(default)]
    pub is_default: bool,
    /// Rule type.
    pub section_type: SectionType,
    /// Stateful or stateless enforcement.
    pub stateful: bool,
    /// Enforcement points of every rule in the section.
    #[serde(default)]
    pub applied_to: Vec<ResourceReference>,
    /// Rules in evaluation order.
    #[serde(default)]
    #[validate(nested)]
    pub rules: Vec<FirewallRuleConfig>,
}

impl FirewallSectionResource {
    /// Create a record for a new section.
    #[must_use]
    pub fn new(section_type: SectionType, stateful: bool) -> Self {
        Self {
            id: None,
            revision: 0,
            display_name: None,
            description: None,
            tags: Vec::new(),
            is_default: false,
            section_type,
            stateful,
            applied_to: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Check field lengths and reference target types.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        validate_references("applied_to", &self.applied_to, APPLIED_TO_TARGET_TYPES)?;
        self.rules
            .iter()
            .try_for_each(FirewallRuleConfig::check_references)
    }

    fn to_section(&self, revision: Option<i64>) -> FirewallSection {
        FirewallSection {
            meta: ManagedResource::new(
                self.display_name.clone(),
                self.description.clone(),
                self.tags.clone(),
            )
            .with_revision(revision),
            applied_tos: self.applied_to.clone(),
            is_default: self.is_default,
            section_type: self.section_type,
            stateful: self.stateful,
            rule_count: None,
            locked: None,
        }
    }

    fn to_section_with_rules(&self, revision: Option<i64>) -> FirewallSectionRuleList {
        FirewallSectionRuleList {
            section: self.to_section(revision),
            rules: self.rules.iter().map(FirewallRuleConfig::to_rule).collect(),
        }
    }

    fn apply(&mut self, listed: &FirewallSectionRuleList) {
        let section = &listed.section;
        self.revision = section.meta.revision.unwrap_or_default();
        self.display_name.clone_from(&section.meta.display_name);
        self.description.clone_from(&section.meta.description);
        self.tags.clone_from(&section.meta.tags);
        self.is_default = section.is_default;
        self.section_type = section.section_type;
        self.stateful = section.stateful;
        self.rules = listed.rules.iter().map(FirewallRuleConfig::from_rule).collect();
    }

    async fn update_empty(&self, api: &dyn FirewallSectionApi, id: &SectionId) -> Result<()> {
        api.update_section(id, &self.to_section(Some(self.revision)))
            .await
            .map_err(|err| err.during(Self::KIND, "update"))?;

        let current = api
            .get_section_with_rules(id)
            .await
            .map_err(|err| err.during(Self::KIND, "update"))?;

        for rule in &current.rules {
            let Some(rule_id) = rule.meta.id.as_deref() else {
                continue;
            };
            let rule_id = RuleId::parse_str(rule_id)?;
            match api.delete_rule(id, &rule_id).await {
                Ok(()) => {}
                Err(err) if err.is_not_found() => {
                    debug!(section = %id, rule = %rule_id, "rule already deleted");
                }
                Err(err) => return Err(err.during(Self::KIND, "update")),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Resource for FirewallSectionResource {
    const KIND: &'static str = "FirewallSection";
    type Api = dyn FirewallSectionApi;

    async fn create(&mut self, api: &Self::Api) -> Result<()> {
        self.check()?;

        let id = if self.rules.is_empty() {
            api.add_section(&self.to_section(None))
                .await
                .map_err(|err| err.during(Self::KIND, "create"))?
                .meta
                .id
        } else {
            api.add_section_with_rules(&self.to_section_with_rules(None))
                .await
                .map_err(|err| err.during(Self::KIND, "create"))?
                .section
                .meta
                .id
        };
        self.id = Some(assigned_id(Self::KIND, id)?);

        self.read(api).await
    }

    async fn read(&mut self, api: &Self::Api) -> Result<()> {
        let id: SectionId = require_id(Self::KIND, self.id.as_deref())?;

        let listed = api.get_section_with_rules(&id).await;
        let Some(listed) = found(Self::KIND, "read", &mut self.id, listed)? else {
            return Ok(());
        };
        self.apply(&listed);

        // applied_tos is only returned by the plain section GET
        let section = api.get_section(&id).await;
        let Some(section) = found(Self::KIND, "read", &mut self.id, section)? else {
            return Ok(());
        };
        self.applied_to = section.applied_tos;
        Ok(())
    }

    async fn update(&mut self, api: &Self::Api) -> Result<()> {
        let id: SectionId = require_id(Self::KIND, self.id.as_deref())?;
        self.check()?;

        if self.rules.is_empty() {
            self.update_empty(api, &id).await?;
        } else {
            api.update_section_with_rules(&id, &self.to_section_with_rules(Some(self.revision)))
                .await
                .map_err(|err| err.during(Self::KIND, "update"))?;
        }

        self.read(api).await
    }

    async fn delete(&mut self, api: &Self::Api) -> Result<()> {
        let id: SectionId = require_id(Self::KIND, self.id.as_deref())?;
        let result = api.delete_section(&id, true).await;
        deleted(Self::KIND, &mut self.id, result)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
