//! # nsxt-resources
//!
//! Declarative NSX-T resources. Each record type holds the desired state of one
//! remote object, and its [`Resource`] handlers translate that state into calls
//! on the typed Manager and Policy clients.
//!
//! ```no_run
//! # async fn example() -> nsxt_core::Result<()> {
//! use nsxt_manager::NatAction;
//! use nsxt_resources::{NatRuleResource, NsxtProvider, Resource};
//!
//! let provider = NsxtProvider::from_env()?;
//! let mut rule = NatRuleResource::new("lr-1", NatAction::Snat);
//! rule.translated_network = Some("10.0.0.1".into());
//! rule.create(provider.manager()).await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod api;
pub mod firewall_section;
pub mod l4_port_set_ns_service;
pub mod nat_rule;
pub mod provider;
pub mod resource;
pub mod tier0_security_config;
pub mod transport_zone_profile;

pub use firewall_section::{FirewallRuleConfig, FirewallSectionResource};
pub use l4_port_set_ns_service::L4PortSetNsServiceResource;
pub use nat_rule::NatRuleResource;
pub use provider::NsxtProvider;
pub use resource::{DataSource, Resource};
pub use tier0_security_config::Tier0SecurityConfigResource;
pub use transport_zone_profile::TransportZoneProfileDataSource;

/// Convenient result alias that reuses the shared NSX-T error type.
pub type Result<T> = nsxt_core::Result<T>;
