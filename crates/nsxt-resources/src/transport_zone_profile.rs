//! Transport-zone profile lookup.

use crate::api::TransportZoneProfileApi;
use crate::resource::DataSource;
use async_trait::async_trait;
use nsxt_core::ids::TransportZoneProfileId;
use nsxt_core::query::ListParams;
use nsxt_core::{Error, Result};
use nsxt_policy::PolicyTransportZoneProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Transport-zone profile looked up by id or by exact display name.
///
/// A name lookup scans the first page of the profile list only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportZoneProfileDataSource {
    /// Profile id; takes precedence over the display name.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name to match exactly.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Description (read-only).
    #[serde(default)]
    pub description: Option<String>,
    /// Policy path (read-only).
    #[serde(default)]
    pub path: Option<String>,
    /// Whether this is the system default profile (read-only).
    #[serde(default)]
    pub is_default: bool,
    /// BFD profile path (read-only).
    #[serde(default)]
    pub bfd_profile_path: Option<String>,
}

impl TransportZoneProfileDataSource {
    /// Look up a profile by id.
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Look up a profile by display name.
    #[must_use]
    pub fn by_name(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            ..Self::default()
        }
    }

    async fn lookup(&self, api: &dyn TransportZoneProfileApi) -> Result<PolicyTransportZoneProfile> {
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            let id = TransportZoneProfileId::parse_str(id)?;
            return api.get_transport_zone_profile(&id).await;
        }

        let Some(name) = self.display_name.as_deref().filter(|name| !name.is_empty()) else {
            return Err(Error::ValidationError(
                "transport zone profile lookup needs an id or a display_name".to_string(),
            ));
        };

        let page = api
            .list_transport_zone_profiles(&ListParams::new())
            .await?;
        if page.has_more() {
            debug!(display_name = %name, "transport zone profile list has further pages, not followed");
        }

        let mut matches = page
            .results
            .into_iter()
            .filter(|profile| profile.meta.display_name.as_deref() == Some(name));

        match (matches.next(), matches.next()) {
            (Some(profile), None) => Ok(profile),
            (None, _) => Err(Error::NotFound(format!(
                "transport zone profile with name `{name}`"
            ))),
            (Some(_), Some(_)) => Err(Error::ValidationError(format!(
                "multiple transport zone profiles with name `{name}`"
            ))),
        }
    }

    fn apply(&mut self, profile: PolicyTransportZoneProfile) {
        self.id = profile.meta.id;
        self.display_name = profile.meta.display_name;
        self.description = profile.meta.description;
        self.path = profile.hierarchy.path;
        self.is_default = profile.is_default;
        self.bfd_profile_path = profile.bfd_profile_path;
    }
}

#[async_trait]
impl DataSource for TransportZoneProfileDataSource {
    const KIND: &'static str = "TransportZoneProfile";
    type Api = dyn TransportZoneProfileApi;

    async fn read(&mut self, api: &Self::Api) -> Result<()> {
        let profile = self
            .lookup(api)
            .await
            .map_err(|err| err.during(Self::KIND, "read"))?;
        self.apply(profile);
        Ok(())
    }
}
