//! Core NSX-T domain types.
//!
//! NSX-T exposes the same appliance through several REST surfaces. This module
//! enumerates them together with their base paths.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Supported NSX-T API surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NsxtApi {
    /// Manager API (`/api/v1/`)
    Manager,
    /// Local Manager Policy API (`/policy/api/v1/`)
    Policy,
    /// Global Manager Policy API (`/global-manager/api/v1/`)
    GlobalPolicy,
}

impl NsxtApi {
    /// Returns the API name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Policy => "policy",
            Self::GlobalPolicy => "global_policy",
        }
    }

    /// Returns all available API surfaces.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Manager, Self::Policy, Self::GlobalPolicy]
    }

    /// Returns the base path, relative to the manager host, with a trailing slash.
    #[must_use]
    pub const fn base_path(&self) -> &'static str {
        match self {
            Self::Manager => "api/v1/",
            Self::Policy => "policy/api/v1/",
            Self::GlobalPolicy => "global-manager/api/v1/",
        }
    }

    /// Returns the root of the policy object tree (`infra` or `global-infra`).
    ///
    /// The Manager API has no policy tree and reports `infra`.
    #[must_use]
    pub const fn infra_root(&self) -> &'static str {
        match self {
            Self::GlobalPolicy => "global-infra",
            Self::Manager | Self::Policy => "infra",
        }
    }

    /// Returns true for the policy flavours.
    #[must_use]
    pub const fn is_policy(&self) -> bool {
        matches!(self, Self::Policy | Self::GlobalPolicy)
    }
}

impl FromStr for NsxtApi {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "manager" | "mp" => Ok(Self::Manager),
            "policy" => Ok(Self::Policy),
            "global_policy" | "global-manager" | "gm" => Ok(Self::GlobalPolicy),
            _ => Err(Error::InvalidRequest(format!("Unknown NSX-T API: {s}"))),
        }
    }
}

impl std::fmt::Display for NsxtApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_names() {
        assert_eq!(NsxtApi::Manager.name(), "manager");
        assert_eq!(NsxtApi::Policy.name(), "policy");
        assert_eq!(NsxtApi::GlobalPolicy.name(), "global_policy");
        assert_eq!(NsxtApi::all().len(), 3);
    }

    #[test]
    fn test_base_paths_end_with_slash() {
        for api in NsxtApi::all() {
            assert!(api.base_path().ends_with('/'), "{api}");
            assert!(!api.base_path().starts_with('/'), "{api}");
        }
        assert_eq!(NsxtApi::GlobalPolicy.base_path(), "global-manager/api/v1/");
    }

    #[test]
    fn test_infra_root() {
        assert_eq!(NsxtApi::Policy.infra_root(), "infra");
        assert_eq!(NsxtApi::GlobalPolicy.infra_root(), "global-infra");
        assert!(NsxtApi::GlobalPolicy.is_policy());
        assert!(!NsxtApi::Manager.is_policy());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Manager".parse::<NsxtApi>().unwrap(), NsxtApi::Manager);
        assert_eq!("gm".parse::<NsxtApi>().unwrap(), NsxtApi::GlobalPolicy);
        assert!(matches!(
            "vcenter".parse::<NsxtApi>().unwrap_err(),
            Error::InvalidRequest(_)
        ));
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&NsxtApi::GlobalPolicy).unwrap();
        assert_eq!(json, "\"global_policy\"");
    }
}
