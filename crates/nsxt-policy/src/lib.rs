//! NSX-T Policy and Global Manager API client and data models.
//!
//! The same client serves a local manager (`/policy/api/v1/infra`) and a
//! global manager (`/global-manager/api/v1/global-infra`).

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{PolicyClient, PolicyClientBuilder};
pub use models::{
    PolicyPath, PolicyTransportZoneProfile, SecurityConfigParams, SecurityFeature,
    Tier0SecurityFeatures,
};

/// Convenient result alias that reuses the shared NSX-T error type.
pub type Result<T> = nsxt_core::Result<T>;
