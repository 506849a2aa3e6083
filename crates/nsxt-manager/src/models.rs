//! Manager API object models.

use nsxt_core::models::{ManagedResource, ResourceReference};
use nsxt_core::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `resource_type` of an L4 port-set service element.
pub const L4_PORT_SET_NS_SERVICE: &str = "L4PortSetNSService";

/// `resource_type` of an NS service.
pub const NS_SERVICE: &str = "NSService";

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = $wire]
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Returns the wire representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Returns every accepted value.
            #[must_use]
            pub const fn all() -> &'static [Self] {
                &[$(Self::$variant,)+]
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Error> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(Error::ValidationError(format!(
                        "expected {} to be one of [{}], got `{s}`",
                        stringify!($name),
                        [$($wire),+].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// Type of rules a firewall section can contain.
    SectionType {
        Layer2 => "LAYER2",
        Layer3 => "LAYER3",
    }
);

wire_enum!(
    /// Action enforced on packets matching a firewall rule.
    RuleAction {
        Allow => "ALLOW",
        Drop => "DROP",
        Reject => "REJECT",
    }
);

wire_enum!(
    /// Direction of a stateless firewall rule.
    RuleDirection {
        In => "IN",
        Out => "OUT",
        InOut => "IN_OUT",
    }
);

wire_enum!(
    /// IP protocol matched by a firewall rule.
    IpProtocol {
        Ipv4 => "IPV4",
        Ipv6 => "IPV6",
        Ipv4Ipv6 => "IPV4_IPV6",
    }
);

wire_enum!(
    /// NAT rule action.
    NatAction {
        Snat => "SNAT",
        Dnat => "DNAT",
        NoNat => "NO_NAT",
        Reflexive => "REFLEXIVE",
    }
);

/// Service matched by a firewall rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FirewallService {
    /// Reference to an `NSService` or `NSServiceGroup`.
    #[serde(flatten)]
    pub reference: ResourceReference,
    /// Inline service element, when the rule defines one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<serde_json::Value>,
}

impl From<ResourceReference> for FirewallService {
    fn from(reference: ResourceReference) -> Self {
        Self {
            reference,
            service: None,
        }
    }
}

/// Distributed firewall rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirewallRule {
    /// Common fields.
    #[serde(flatten)]
    pub meta: ManagedResource,
    /// Action.
    pub action: RuleAction,
    /// Enforcement points; overridden by the section.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied_tos: Vec<ResourceReference>,
    /// Sources; empty means any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<ResourceReference>,
    /// Negate the sources.
    #[serde(default)]
    pub sources_excluded: bool,
    /// Destinations; empty means any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<ResourceReference>,
    /// Negate the destinations.
    #[serde(default)]
    pub destinations_excluded: bool,
    /// Services; empty means any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<FirewallService>,
    /// Direction (stateless sections only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<RuleDirection>,
    /// Persisted but never realized when set.
    #[serde(default)]
    pub disabled: bool,
    /// IP protocol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_protocol: Option<IpProtocol>,
    /// Packet logging.
    #[serde(default)]
    pub logged: bool,
    /// User notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Tag printed in CLI output and packet logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_tag: Option<String>,
    /// Owning section (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
}

impl FirewallRule {
    /// Create a rule with the given action and no match criteria.
    #[must_use]
    pub fn new(action: RuleAction) -> Self {
        Self {
            meta: ManagedResource::default(),
            action,
            applied_tos: Vec::new(),
            sources: Vec::new(),
            sources_excluded: false,
            destinations: Vec::new(),
            destinations_excluded: false,
            services: Vec::new(),
            direction: None,
            disabled: false,
            ip_protocol: None,
            logged: false,
            notes: None,
            rule_tag: None,
            section_id: None,
        }
    }
}

/// Firewall section without its rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirewallSection {
    /// Common fields.
    #[serde(flatten)]
    pub meta: ManagedResource,
    /// Enforcement points of every rule in the section.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied_tos: Vec<ResourceReference>,
    /// Whether this is the default section.
    #[serde(default)]
    pub is_default: bool,
    /// Rule type.
    pub section_type: SectionType,
    /// Stateful or stateless enforcement.
    pub stateful: bool,
    /// Number of rules (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_count: Option<i64>,
    /// Whether the section is locked (read-only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

/// Firewall section together with its rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FirewallSectionRuleList {
    /// Section fields.
    #[serde(flatten)]
    pub section: FirewallSection,
    /// Rules, in evaluation order.
    #[serde(default)]
    pub rules: Vec<FirewallRule>,
}

/// NAT rule of a logical router.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NatRule {
    /// Common fields.
    #[serde(flatten)]
    pub meta: ManagedResource,
    /// Action.
    pub action: NatAction,
    /// Rule enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Rule logging.
    #[serde(default)]
    pub logging: bool,
    /// Owning logical router.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_router_id: Option<String>,
    /// Destination match; `None` means any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_destination_network: Option<String>,
    /// Source match; `None` means any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_source_network: Option<String>,
    /// Service match, passed through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_service: Option<serde_json::Value>,
    /// Skip the firewall stage when matched.
    #[serde(default = "default_true")]
    pub nat_pass: bool,
    /// Ascending priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_priority: Option<i64>,
    /// Translated address, range or CIDR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_network: Option<String>,
    /// Translated port or port range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_ports: Option<String>,
}

const fn default_true() -> bool {
    true
}

/// L4 port-set element of an NS service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct L4PortSetNsServiceEntry {
    /// Always `L4PortSetNSService`.
    pub resource_type: String,
    /// L4 protocol, e.g. `TCP`.
    pub l4_protocol: String,
    /// Source ports or ranges.
    #[serde(default)]
    pub source_ports: Vec<String>,
    /// Destination ports or ranges.
    #[serde(default)]
    pub destination_ports: Vec<String>,
}

impl L4PortSetNsServiceEntry {
    /// Create an element for the given protocol and ports.
    #[must_use]
    pub fn new(
        l4_protocol: impl Into<String>,
        source_ports: Vec<String>,
        destination_ports: Vec<String>,
    ) -> Self {
        Self {
            resource_type: L4_PORT_SET_NS_SERVICE.to_string(),
            l4_protocol: l4_protocol.into(),
            source_ports,
            destination_ports,
        }
    }
}

/// NS service carrying an L4 port-set element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct L4PortSetNsService {
    /// Common fields.
    #[serde(flatten)]
    pub meta: ManagedResource,
    /// System-created services cannot be modified or deleted.
    #[serde(default)]
    pub default_service: bool,
    /// Service element.
    pub nsservice_element: L4PortSetNsServiceEntry,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_enums_round_trip_strings() {
        assert_eq!("IN_OUT".parse::<RuleDirection>().unwrap(), RuleDirection::InOut);
        assert_eq!(IpProtocol::Ipv4Ipv6.to_string(), "IPV4_IPV6");
        assert_eq!(
            serde_json::to_value(NatAction::NoNat).unwrap(),
            json!("NO_NAT")
        );
        assert_eq!(SectionType::all().len(), 2);
    }

    #[test]
    fn wire_enums_reject_unknown_values() {
        let err = "PERMIT".parse::<RuleAction>().unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
        assert!(err.to_string().contains("ALLOW, DROP, REJECT"));

        // Case sensitive, like the API.
        assert!("layer3".parse::<SectionType>().is_err());
        assert!(serde_json::from_value::<NatAction>(json!("MASQUERADE")).is_err());
    }

    #[test]
    fn section_rule_list_parses_manager_response() {
        let value = json!({
            "id": "sec-1",
            "display_name": "web",
            "resource_type": "FirewallSection",
            "_revision": 3,
            "section_type": "LAYER3",
            "stateful": true,
            "is_default": false,
            "rule_count": 1,
            "rules": [{
                "id": "1031",
                "action": "ALLOW",
                "direction": "IN_OUT",
                "ip_protocol": "IPV4_IPV6",
                "sources": [{"target_id": "ip-1", "target_type": "IPSet", "is_valid": true}],
                "services": [{"target_id": "svc-1", "target_type": "NSService"}],
                "_revision": 0
            }]
        });

        let parsed: FirewallSectionRuleList = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.section.meta.revision, Some(3));
        assert_eq!(parsed.section.section_type, SectionType::Layer3);
        assert_eq!(parsed.rules.len(), 1);

        let rule = &parsed.rules[0];
        assert_eq!(rule.action, RuleAction::Allow);
        assert_eq!(rule.direction, Some(RuleDirection::InOut));
        assert_eq!(rule.sources[0].target_type.as_deref(), Some("IPSet"));
        assert_eq!(
            rule.services[0].reference.target_id.as_deref(),
            Some("svc-1")
        );
        assert!(!rule.logged);
    }

    #[test]
    fn nat_rule_defaults() {
        let rule: NatRule = serde_json::from_value(json!({"action": "SNAT"})).unwrap();
        assert!(rule.enabled);
        assert!(rule.nat_pass);
        assert!(!rule.logging);
    }

    #[test]
    fn l4_port_set_service_shape() {
        let service = L4PortSetNsService {
            meta: ManagedResource::new(Some("https".into()), None, Vec::new())
                .with_resource_type(NS_SERVICE),
            default_service: false,
            nsservice_element: L4PortSetNsServiceEntry::new(
                "TCP",
                Vec::new(),
                vec!["443".into()],
            ),
        };

        let value = serde_json::to_value(&service).unwrap();
        assert_eq!(value["resource_type"], json!("NSService"));
        assert_eq!(
            value["nsservice_element"]["resource_type"],
            json!("L4PortSetNSService")
        );
        assert_eq!(value["nsservice_element"]["destination_ports"], json!(["443"]));
    }
}
