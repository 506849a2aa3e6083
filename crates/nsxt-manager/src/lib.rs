//! NSX-T Manager API client and data models.
//!
//! Provides typed structures and an asynchronous client for the Manager API
//! objects handled by the provider: distributed firewall sections and rules,
//! logical router NAT rules and L4 port-set NS services.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{ManagerClient, ManagerClientBuilder};
pub use models::{
    FirewallRule, FirewallSection, FirewallSectionRuleList, FirewallService, IpProtocol,
    L4PortSetNsService, L4PortSetNsServiceEntry, NatAction, NatRule, RuleAction, RuleDirection,
    SectionType,
};

/// Convenient result alias that reuses the shared NSX-T error type.
pub type Result<T> = nsxt_core::Result<T>;
