//! Strongly-typed identifiers for NSX-T objects.
//!
//! NSX-T identifiers are opaque strings: manager objects use UUIDs, NAT rules
//! use numeric strings and policy objects use user-chosen names. The wrappers
//! below keep them from being mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed identifier wrapper types.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parses an identifier that must fit in a single URL path segment.
            ///
            /// # Errors
            ///
            /// Returns an error if [`validate_id`] rejects the string.
            pub fn parse_str(input: &str) -> Result<Self> {
                validate_id(input).map(|id| Self(id.to_string()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Converts into the inner [`String`].
            #[must_use]
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                validate_id(&value)?;
                Ok(Self(value))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Manager API
id_type!(SectionId, "Firewall section identifier");
id_type!(RuleId, "Firewall rule identifier");
id_type!(NatRuleId, "NAT rule identifier");
id_type!(LogicalRouterId, "Logical router identifier");
id_type!(NsServiceId, "NS service identifier");

// Policy API
id_type!(Tier0Id, "Tier-0 gateway identifier");
id_type!(TransportZoneProfileId, "Transport zone profile identifier");

/// Characters that would end or escape the path segment an id is placed in.
const RESERVED_CHARS: &[char] = &['/', '\\', '?', '#', '%'];

/// Validates an identifier string.
///
/// Identifiers are interpolated into URL paths as a single segment, so they
/// must be non-empty, must not be `.` or `..`, and must not contain `/`, `\`,
/// `?`, `#`, `%` or control characters.
///
/// # Errors
///
/// Returns [`Error::InvalidId`] if the identifier is rejected.
pub fn validate_id(s: &str) -> Result<&str> {
    if s.trim().is_empty() {
        return Err(Error::InvalidId("identifier must not be empty".to_string()));
    }
    if s == "." || s == ".." {
        return Err(Error::InvalidId(format!("`{s}` is not a valid identifier")));
    }
    if s.contains(RESERVED_CHARS) || s.chars().any(char::is_control) {
        return Err(Error::InvalidId(format!(
            "identifier `{}` contains a reserved character",
            s.escape_default()
        )));
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION: &str = "3a2ec3ee-6d55-4bcb-8bf1-1c0f0cbb1a45";

    #[test]
    fn test_parse_str_valid() {
        let id = SectionId::parse_str(SECTION).unwrap();
        assert_eq!(id.as_str(), SECTION);
        assert_eq!(id.to_string(), SECTION);
    }

    #[test]
    fn test_numeric_nat_rule_id() {
        let id: NatRuleId = "1026".parse().unwrap();
        assert_eq!(id.as_str(), "1026");
    }

    #[test]
    fn test_parse_str_rejects_blank() {
        assert!(matches!(
            SectionId::parse_str("").unwrap_err(),
            Error::InvalidId(_)
        ));
        assert!(SectionId::parse_str("   ").is_err());
    }

    #[test]
    fn test_parse_str_rejects_path_separator() {
        assert!(Tier0Id::parse_str("t0/../infra").is_err());
        assert!(Tier0Id::parse_str("t0\\infra").is_err());
    }

    #[test]
    fn test_parse_str_rejects_dot_segments() {
        assert!(matches!(
            SectionId::parse_str("..").unwrap_err(),
            Error::InvalidId(_)
        ));
        assert!(SectionId::parse_str(".").is_err());

        // Dots inside an id are fine
        assert!(SectionId::parse_str("web..tier").is_ok());
        assert!(SectionId::parse_str(".hidden").is_ok());
    }

    #[test]
    fn test_parse_str_rejects_query_fragment_and_escapes() {
        for input in ["t0?x", "t0#frag", "t0%2F..", "t0\ngw", "t0\u{7f}"] {
            let err = Tier0Id::parse_str(input).unwrap_err();
            assert!(matches!(err, Error::InvalidId(_)), "accepted {input:?}");
        }
    }

    #[test]
    fn test_try_from_string() {
        let id = Tier0Id::try_from("vmc-t0".to_string()).unwrap();
        assert_eq!(String::from(id), "vmc-t0");
        assert!(Tier0Id::try_from(String::new()).is_err());
    }

    #[test]
    fn test_serde_plain_string() {
        let id = NsServiceId::parse_str(SECTION).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{SECTION}\""));

        let back: NsServiceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<SectionId>("\"\"").is_err());
        assert!(serde_json::from_str::<SectionId>("\"..\"").is_err());
        assert!(serde_json::from_str::<Tier0Id>("\"t0?x\"").is_err());
    }

    #[test]
    fn test_as_ref_and_into_string() {
        let id = LogicalRouterId::parse_str("lr-1").unwrap();
        let s: &str = id.as_ref();
        assert_eq!(s, "lr-1");
        assert_eq!(id.into_string(), "lr-1");
    }
}
