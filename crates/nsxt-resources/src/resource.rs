//! The lifecycle contract shared by every resource, and the helpers that
//! implement its not-found and missing-id rules.

use async_trait::async_trait;
use nsxt_core::models::ResourceReference;
use nsxt_core::{Error, Result};
use std::str::FromStr;
use tracing::{debug, info};

/// Target types accepted by section and rule `applied_to` references.
pub const APPLIED_TO_TARGET_TYPES: &[&str] = &["LogicalPort", "LogicalSwitch", "NSGroup"];

/// Target types accepted by rule source and destination references.
pub const ENDPOINT_TARGET_TYPES: &[&str] =
    &["IPSet", "LogicalPort", "LogicalSwitch", "NSGroup", "MACSet"];

/// Target types accepted by rule service references.
pub const SERVICE_TARGET_TYPES: &[&str] = &["NSService", "NSServiceGroup"];

/// A declaratively managed NSX-T object.
///
/// The record holds the desired configuration plus the identifier and
/// revision of the remote object. Handlers mutate the record in place:
///
/// * `create` stores the new identifier, then reads the object back.
/// * `read` clears the identifier when the object is gone.
/// * `update` submits the stored revision; a missing object is an error.
/// * `delete` clears the identifier, also when the object was already gone.
///
/// `read`, `update` and `delete` fail with [`Error::MissingId`] when the record
/// has no identifier.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Resource kind used in errors and logs.
    const KIND: &'static str;

    /// Remote API the handlers call.
    type Api: ?Sized + Sync;

    /// Create the remote object.
    async fn create(&mut self, api: &Self::Api) -> Result<()>;

    /// Refresh the record from the remote object.
    async fn read(&mut self, api: &Self::Api) -> Result<()>;

    /// Push the record to the remote object.
    async fn update(&mut self, api: &Self::Api) -> Result<()>;

    /// Delete the remote object.
    async fn delete(&mut self, api: &Self::Api) -> Result<()>;

    /// Returns the identifier of the remote object, if any.
    fn id(&self) -> Option<&str>;
}

/// A read-only lookup of an NSX-T object.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Data source kind used in errors and logs.
    const KIND: &'static str;

    /// Remote API the lookup calls.
    type Api: ?Sized + Sync;

    /// Resolve the object and fill in the record.
    async fn read(&mut self, api: &Self::Api) -> Result<()>;
}

/// Parse the identifier of a record, failing when it is absent.
pub(crate) fn require_id<T>(what: &str, id: Option<&str>) -> Result<T>
where
    T: FromStr<Err = Error>,
{
    match id {
        Some(id) if !id.is_empty() => id.parse(),
        _ => Err(Error::MissingId(what.to_string())),
    }
}

/// Take the identifier assigned by the server.
pub(crate) fn assigned_id(kind: &str, id: Option<String>) -> Result<String> {
    id.filter(|id| !id.is_empty())
        .ok_or_else(|| Error::MissingId(format!("{kind} create returned no id")))
}

/// Resolve a read result, clearing `id` when the object no longer exists.
///
/// Returns `Ok(None)` after a 404. Any other error is wrapped with the kind and
/// action.
pub(crate) fn found<T>(
    kind: &str,
    action: &str,
    id: &mut Option<String>,
    result: Result<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => {
            debug!(resource = kind, id = ?id, "not found, clearing id");
            *id = None;
            Ok(None)
        }
        Err(err) => Err(err.during(kind, action)),
    }
}

/// Resolve a delete result. A 404 counts as already deleted.
pub(crate) fn deleted(kind: &str, id: &mut Option<String>, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => {
            info!(resource = kind, id = ?id, "deleted");
            *id = None;
            Ok(())
        }
        Err(err) if err.is_not_found() => {
            debug!(resource = kind, id = ?id, "not found, clearing id");
            *id = None;
            Ok(())
        }
        Err(err) => Err(err.during(kind, "delete")),
    }
}

/// Check that every reference has a target id and an accepted target type.
pub(crate) fn validate_references(
    field: &str,
    references: &[ResourceReference],
    allowed: &[&str],
) -> Result<()> {
    for reference in references {
        if reference.target_id.as_deref().map_or(true, str::is_empty) {
            return Err(Error::ValidationError(format!(
                "{field}: target_id must be set"
            )));
        }
        match reference.target_type.as_deref() {
            Some(target_type) if allowed.contains(&target_type) => {}
            other => {
                return Err(Error::ValidationError(format!(
                    "expected {field} target_type to be one of [{}], got `{}`",
                    allowed.join(", "),
                    other.unwrap_or_default()
                )))
            }
        }
    }
    Ok(())
}
