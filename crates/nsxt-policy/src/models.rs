//! Policy API object models.

use nsxt_core::models::ManagedResource;
use nsxt_core::query::{ListParams, QueryParams};
use serde::{Deserialize, Serialize};

/// Hierarchy fields carried by every policy object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyPath {
    /// Absolute path of the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Path of the parent object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
    /// Path relative to the parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    /// Set while a delete is being realized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_for_delete: Option<bool>,
    /// Set when a local object overrides a global one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overridden: Option<bool>,
}

/// One tier-0 security feature toggle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityFeature {
    /// Feature name, e.g. `TIER0_FIREWALL`.
    pub feature: String,
    /// Whether the feature is enabled.
    #[serde(default)]
    pub enable: bool,
}

impl SecurityFeature {
    /// Create a feature toggle.
    #[must_use]
    pub fn new(feature: impl Into<String>, enable: bool) -> Self {
        Self {
            feature: feature.into(),
            enable,
        }
    }
}

/// Security configuration of a tier-0 gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tier0SecurityFeatures {
    /// Common fields.
    #[serde(flatten)]
    pub meta: ManagedResource,
    /// Hierarchy fields.
    #[serde(flatten)]
    pub hierarchy: PolicyPath,
    /// Feature toggles.
    #[serde(default)]
    pub features: Vec<SecurityFeature>,
}

/// Transport-zone profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PolicyTransportZoneProfile {
    /// Common fields.
    #[serde(flatten)]
    pub meta: ManagedResource,
    /// Hierarchy fields.
    #[serde(flatten)]
    pub hierarchy: PolicyPath,
    /// Whether this is the system default profile.
    #[serde(default)]
    pub is_default: bool,
    /// BFD health monitoring profile path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bfd_profile_path: Option<String>,
}

/// Query arguments of the tier-0 security-config GET and DELETE calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityConfigParams {
    /// Restrict the call to one feature.
    pub feature: Option<String>,
    /// Paging and sorting.
    pub list: ListParams,
}

impl SecurityConfigParams {
    /// Create empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one feature.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    /// Convert to URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        self.list.append_to(&mut params);
        params.push_opt("feature", self.feature.as_ref());
        params.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn security_features_shape() {
        let value = json!({
            "id": "default",
            "path": "/infra/tier-0s/t0/security-config",
            "parent_path": "/infra/tier-0s/t0",
            "_revision": 2,
            "features": [{"feature": "TIER0_FIREWALL", "enable": true}]
        });

        let parsed: Tier0SecurityFeatures = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.meta.revision, Some(2));
        assert_eq!(parsed.hierarchy.parent_path.as_deref(), Some("/infra/tier-0s/t0"));
        assert_eq!(parsed.features, vec![SecurityFeature::new("TIER0_FIREWALL", true)]);
    }

    #[test]
    fn transport_zone_profile_shape() {
        let parsed: PolicyTransportZoneProfile = serde_json::from_value(json!({
            "id": "tzp-1",
            "display_name": "default-tzp",
            "resource_type": "PolicyTransportZoneProfile",
            "path": "/global-infra/transport-zone-profiles/tzp-1",
            "is_default": true,
            "bfd_profile_path": "/infra/bfd-profiles/default"
        }))
        .unwrap();

        assert!(parsed.is_default);
        assert_eq!(parsed.meta.display_name.as_deref(), Some("default-tzp"));
        assert_eq!(
            parsed.hierarchy.path.as_deref(),
            Some("/global-infra/transport-zone-profiles/tzp-1")
        );
    }

    #[test]
    fn security_config_params_pairs() {
        let params = SecurityConfigParams::new().with_feature("TIER0_FIREWALL");
        assert_eq!(params.to_pairs(), vec![("feature", "TIER0_FIREWALL".to_string())]);
        assert!(SecurityConfigParams::new().to_pairs().is_empty());
    }
}
