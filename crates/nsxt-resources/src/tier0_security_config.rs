//! Security feature configuration of a tier-0 gateway.

use crate::api::Tier0SecurityConfigApi;
use crate::resource::{deleted, found, require_id, Resource};
use async_trait::async_trait;
use nsxt_core::ids::Tier0Id;
use nsxt_core::models::{ManagedResource, Tag};
use nsxt_core::Result;
use nsxt_policy::{SecurityConfigParams, SecurityFeature, Tier0SecurityFeatures};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tier-0 security configuration record.
///
/// The configuration is a singleton below its gateway, so the record id is the
/// tier-0 id once the configuration has been created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Tier0SecurityConfigResource {
    /// Tier-0 id, set after create.
    #[serde(default)]
    pub id: Option<String>,
    /// Gateway the configuration belongs to.
    #[validate(length(min = 1))]
    pub tier0_id: String,
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
    /// Policy path (read-only).
    #[serde(default)]
    pub path: Option<String>,
    /// Feature toggles.
    #[serde(default)]
    pub features: Vec<SecurityFeature>,
}

impl Tier0SecurityConfigResource {
    /// Create a record for the given gateway.
    #[must_use]
    pub fn new(tier0_id: impl Into<String>) -> Self {
        Self {
            tier0_id: tier0_id.into(),
            ..Self::default()
        }
    }

    fn to_features(&self, revision: Option<i64>) -> Tier0SecurityFeatures {
        Tier0SecurityFeatures {
            meta: ManagedResource::new(
                self.display_name.clone(),
                self.description.clone(),
                self.tags.clone(),
            )
            .with_revision(revision),
            features: self.features.clone(),
            ..Tier0SecurityFeatures::default()
        }
    }

    fn apply(&mut self, config: Tier0SecurityFeatures) {
        self.revision = config.meta.revision.unwrap_or_default();
        self.display_name = config.meta.display_name;
        self.description = config.meta.description;
        self.tags = config.meta.tags;
        self.path = config.hierarchy.path;
        self.features = config.features;
    }
}

#[async_trait]
impl Resource for Tier0SecurityConfigResource {
    const KIND: &'static str = "Tier0SecurityConfig";
    type Api = dyn Tier0SecurityConfigApi;

    async fn create(&mut self, api: &Self::Api) -> Result<()> {
        self.validate()?;
        let tier0: Tier0Id = self.tier0_id.parse()?;

        // PATCH creates the configuration, or merges into an existing one
        api.patch_tier0_security_config(&tier0, &self.to_features(None))
            .await
            .map_err(|err| err.during(Self::KIND, "create"))?;
        self.id = Some(tier0.into_string());

        self.read(api).await
    }

    async fn read(&mut self, api: &Self::Api) -> Result<()> {
        let tier0: Tier0Id = require_id(Self::KIND, self.id.as_deref())?;

        let result = api
            .get_tier0_security_config(&tier0, &SecurityConfigParams::new())
            .await;
        if let Some(config) = found(Self::KIND, "read", &mut self.id, result)? {
            self.tier0_id = tier0.into_string();
            self.apply(config);
        }
        Ok(())
    }

    async fn update(&mut self, api: &Self::Api) -> Result<()> {
        let tier0: Tier0Id = require_id(Self::KIND, self.id.as_deref())?;
        self.validate()?;

        api.update_tier0_security_config(&tier0, &self.to_features(Some(self.revision)))
            .await
            .map_err(|err| err.during(Self::KIND, "update"))?;

        self.read(api).await
    }

    async fn delete(&mut self, api: &Self::Api) -> Result<()> {
        let tier0: Tier0Id = require_id(Self::KIND, self.id.as_deref())?;
        let result = api
            .delete_tier0_security_config(&tier0, &SecurityConfigParams::new())
            .await;
        deleted(Self::KIND, &mut self.id, result)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTier0SecurityConfigApi;
    use nsxt_core::Error;

    fn record() -> Tier0SecurityConfigResource {
        let mut record = Tier0SecurityConfigResource::new("t0-gw");
        record.features = vec![SecurityFeature::new("TIER0_FIREWALL", true)];
        record
    }

    fn server_config(revision: i64) -> Tier0SecurityFeatures {
        let mut config = record().to_features(Some(revision));
        config.hierarchy.path = Some("/infra/tier-0s/t0-gw/security-config".into());
        config
    }

    #[tokio::test]
    async fn create_patches_and_reads_back() {
        let mut api = MockTier0SecurityConfigApi::new();
        api.expect_patch_tier0_security_config()
            .withf(|tier0, config| tier0.as_str() == "t0-gw" && config.features.len() == 1)
            .times(1)
            .returning(|_, _| Ok(server_config(0)));
        api.expect_get_tier0_security_config()
            .returning(|_, _| Ok(server_config(0)));

        let mut record = record();
        record.create(&api).await.unwrap();
        assert_eq!(record.id.as_deref(), Some("t0-gw"));
        assert_eq!(
            record.path.as_deref(),
            Some("/infra/tier-0s/t0-gw/security-config")
        );
    }

    #[tokio::test]
    async fn create_requires_tier0() {
        let api = MockTier0SecurityConfigApi::new();
        let mut record = Tier0SecurityConfigResource::new("");
        let err = record.create(&api).await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[tokio::test]
    async fn update_puts_with_revision() {
        let mut api = MockTier0SecurityConfigApi::new();
        api.expect_update_tier0_security_config()
            .withf(|_, config| config.meta.revision == Some(7))
            .times(1)
            .returning(|_, _| Ok(server_config(8)));
        api.expect_get_tier0_security_config()
            .returning(|_, _| Ok(server_config(8)));

        let mut record = record();
        record.id = Some("t0-gw".into());
        record.revision = 7;
        record.update(&api).await.unwrap();
        assert_eq!(record.revision, 8);
    }

    #[tokio::test]
    async fn update_stale_revision_is_an_error() {
        let mut api = MockTier0SecurityConfigApi::new();
        api.expect_update_tier0_security_config()
            .returning(|_, _| Err(Error::Conflict("stale revision".into())));

        let mut record = record();
        record.id = Some("t0-gw".into());
        let err = record.update(&api).await.unwrap_err();
        assert!(err.to_string().contains("Conflict: stale revision"));
    }

    #[tokio::test]
    async fn read_not_found_clears_id() {
        let mut api = MockTier0SecurityConfigApi::new();
        api.expect_get_tier0_security_config()
            .returning(|_, _| Err(Error::NotFound("gone".into())));

        let mut record = record();
        record.id = Some("t0-gw".into());
        record.read(&api).await.unwrap();
        assert!(record.id.is_none());
    }

    #[tokio::test]
    async fn delete_tolerates_not_found() {
        let mut api = MockTier0SecurityConfigApi::new();
        api.expect_delete_tier0_security_config()
            .returning(|_, _| Err(Error::NotFound("gone".into())));

        let mut record = record();
        record.id = Some("t0-gw".into());
        record.delete(&api).await.unwrap();
        assert!(record.id.is_none());
    }
}
