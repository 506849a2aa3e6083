//! Object model shared by every NSX-T resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scope/tag pair attached to an NSX-T object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    /// Tag scope.
    #[serde(default)]
    pub scope: String,
    /// Tag value.
    #[serde(default)]
    pub tag: String,
}

impl Tag {
    /// Create a tag.
    #[must_use]
    pub fn new(scope: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            tag: tag.into(),
        }
    }
}

/// Reference to another NSX-T object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceReference {
    /// Whether the referenced object still exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
    /// Display name of the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_display_name: Option<String>,
    /// Identifier of the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Type of the target, e.g. `NSGroup`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
}

impl ResourceReference {
    /// Reference an object by type and identifier.
    #[must_use]
    pub fn new(target_type: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            target_type: Some(target_type.into()),
            target_id: Some(target_id.into()),
            ..Self::default()
        }
    }
}

/// Fields carried by every managed NSX-T object.
///
/// Embedded into object models with `#[serde(flatten)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManagedResource {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name, defaults to the id on the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Object type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Optimistic-concurrency token; must be echoed on update.
    #[serde(rename = "_revision", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
    /// Whether the object is owned by the system.
    #[serde(
        rename = "_system_owned",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub system_owned: Option<bool>,
    /// Creation timestamp.
    #[serde(
        rename = "_create_time",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub create_time: Option<DateTime<Utc>>,
    /// User that created the object.
    #[serde(rename = "_create_user", default, skip_serializing_if = "Option::is_none")]
    pub create_user: Option<String>,
    /// Last modification timestamp.
    #[serde(
        rename = "_last_modified_time",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub last_modified_time: Option<DateTime<Utc>>,
    /// User that last modified the object.
    #[serde(
        rename = "_last_modified_user",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified_user: Option<String>,
}

impl ManagedResource {
    /// Build the user-settable part of an object.
    #[must_use]
    pub fn new(display_name: Option<String>, description: Option<String>, tags: Vec<Tag>) -> Self {
        Self {
            display_name,
            description,
            tags,
            ..Self::default()
        }
    }

    /// Set the object type.
    #[must_use]
    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    /// Set the revision to submit.
    #[must_use]
    pub const fn with_revision(mut self, revision: Option<i64>) -> Self {
        self.revision = revision;
        self
    }
}

/// One page of a list response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResult<T> {
    /// Page contents.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Total number of results, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_count: Option<i64>,
    /// Cursor for the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Sort field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_ascending: Option<bool>,
}

impl<T> ListResult<T> {
    /// Returns true if the server reported another page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}
