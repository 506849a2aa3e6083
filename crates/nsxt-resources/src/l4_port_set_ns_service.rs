//! NS service matching an L4 protocol and port sets.

use crate::api::NsServiceApi;
use crate::resource::{assigned_id, deleted, found, require_id, Resource};
use async_trait::async_trait;
use nsxt_core::ids::NsServiceId;
use nsxt_core::models::{ManagedResource, Tag};
use nsxt_core::Result;
use nsxt_manager::models::NS_SERVICE;
use nsxt_manager::{L4PortSetNsService, L4PortSetNsServiceEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// L4 port-set NS service record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct L4PortSetNsServiceResource {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Revision last read from the server.
    #[serde(default)]
    pub revision: i64,
    /// Whether the object is owned by the system (read-only).
    #[serde(default)]
    pub system_owned: bool,
    /// Display name.
    #[serde(default)]
    #[validate(length(max = 255))]
    pub display_name: Option<String>,
    /// Description.
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub description: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// System-created services cannot be modified or deleted (read-only).
    #[serde(default)]
    pub default_service: bool,
    /// L4 protocol, e.g. `TCP` or `UDP`.
    #[validate(length(min = 1))]
    pub l4_protocol: String,
    /// Source ports or port ranges.
    #[serde(default)]
    pub source_ports: BTreeSet<String>,
    /// Destination ports or port ranges.
    #[serde(default)]
    pub destination_ports: BTreeSet<String>,
}

impl L4PortSetNsServiceResource {
    /// Create a record for a new service.
    #[must_use]
    pub fn new(l4_protocol: impl Into<String>) -> Self {
        Self {
            id: None,
            revision: 0,
            system_owned: false,
            display_name: None,
            description: None,
            tags: Vec::new(),
            default_service: false,
            l4_protocol: l4_protocol.into(),
            source_ports: BTreeSet::new(),
            destination_ports: BTreeSet::new(),
        }
    }

    fn to_service(&self, revision: Option<i64>) -> L4PortSetNsService {
        L4PortSetNsService {
            meta: ManagedResource::new(
                self.display_name.clone(),
                self.description.clone(),
                self.tags.clone(),
            )
            .with_resource_type(NS_SERVICE)
            .with_revision(revision),
            default_service: self.default_service,
            nsservice_element: L4PortSetNsServiceEntry::new(
                self.l4_protocol.clone(),
                self.source_ports.iter().cloned().collect(),
                self.destination_ports.iter().cloned().collect(),
            ),
        }
    }

    fn apply(&mut self, service: L4PortSetNsService) {
        self.revision = service.meta.revision.unwrap_or_default();
        self.system_owned = service.meta.system_owned.unwrap_or_default();
        self.display_name = service.meta.display_name;
        self.description = service.meta.description;
        self.tags = service.meta.tags;
        self.default_service = service.default_service;

        let element = service.nsservice_element;
        self.l4_protocol = element.l4_protocol;
        self.source_ports = element.source_ports.into_iter().collect();
        self.destination_ports = element.destination_ports.into_iter().collect();
    }
}

#[async_trait]
impl Resource for L4PortSetNsServiceResource {
    const KIND: &'static str = "NsService";
    type Api = dyn NsServiceApi;

    async fn create(&mut self, api: &Self::Api) -> Result<()> {
        self.validate()?;

        let created = api
            .create_l4_port_set_ns_service(&self.to_service(None))
            .await
            .map_err(|err| err.during(Self::KIND, "create"))?;
        self.id = Some(assigned_id(Self::KIND, created.meta.id)?);

        self.read(api).await
    }

    async fn read(&mut self, api: &Self::Api) -> Result<()> {
        let id: NsServiceId = require_id(Self::KIND, self.id.as_deref())?;

        let result = api.read_l4_port_set_ns_service(&id).await;
        if let Some(service) = found(Self::KIND, "read", &mut self.id, result)? {
            self.apply(service);
        }
        Ok(())
    }

    async fn update(&mut self, api: &Self::Api) -> Result<()> {
        let id: NsServiceId = require_id(Self::KIND, self.id.as_deref())?;
        self.validate()?;

        api.update_l4_port_set_ns_service(&id, &self.to_service(Some(self.revision)))
            .await
            .map_err(|err| err.during(Self::KIND, "update"))?;

        self.read(api).await
    }

    async fn delete(&mut self, api: &Self::Api) -> Result<()> {
        let id: NsServiceId = require_id(Self::KIND, self.id.as_deref())?;
        let result = api.delete_ns_service(&id).await;
        deleted(Self::KIND, &mut self.id, result)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockNsServiceApi;
    use nsxt_core::Error;
    use nsxt_manager::models::L4_PORT_SET_NS_SERVICE;

    fn record() -> L4PortSetNsServiceResource {
        let mut record = L4PortSetNsServiceResource::new("TCP");
        record.display_name = Some("https".into());
        record.destination_ports = ["443", "8443"].into_iter().map(String::from).collect();
        record
    }

    fn server_service(protocol: &str) -> L4PortSetNsService {
        let mut service = record().to_service(Some(0));
        service.meta.id = Some("svc-1".into());
        service.meta.system_owned = Some(false);
        service.nsservice_element.l4_protocol = protocol.into();
        service
    }

    #[tokio::test]
    async fn create_sends_port_set_element() {
        let mut api = MockNsServiceApi::new();
        api.expect_create_l4_port_set_ns_service()
            .withf(|service| {
                service.meta.resource_type.as_deref() == Some("NSService")
                    && service.nsservice_element.resource_type == L4_PORT_SET_NS_SERVICE
                    && service.nsservice_element.destination_ports == vec!["443", "8443"]
            })
            .times(1)
            .returning(|_| Ok(server_service("TCP")));
        api.expect_read_l4_port_set_ns_service()
            .returning(|_| Ok(server_service("TCP")));

        let mut record = record();
        record.create(&api).await.unwrap();
        assert_eq!(record.id.as_deref(), Some("svc-1"));
        assert_eq!(record.destination_ports.len(), 2);
    }

    #[tokio::test]
    async fn create_unexpected_status_is_fatal() {
        let mut api = MockNsServiceApi::new();
        api.expect_create_l4_port_set_ns_service().returning(|_| {
            Err(Error::UnexpectedStatus {
                status: 200,
                message: "expected 201 Created".into(),
            })
        });
        api.expect_read_l4_port_set_ns_service().never();

        let mut record = record();
        assert!(record.create(&api).await.is_err());
        assert!(record.id.is_none());
    }

    #[tokio::test]
    async fn create_requires_protocol() {
        let api = MockNsServiceApi::new();
        let mut record = L4PortSetNsServiceResource::new("");
        let err = record.create(&api).await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[tokio::test]
    async fn read_refreshes_protocol() {
        let mut api = MockNsServiceApi::new();
        api.expect_read_l4_port_set_ns_service()
            .returning(|_| Ok(server_service("UDP")));

        let mut record = record();
        record.id = Some("svc-1".into());
        record.read(&api).await.unwrap();
        assert_eq!(record.l4_protocol, "UDP");
    }

    #[tokio::test]
    async fn read_not_found_clears_id() {
        let mut api = MockNsServiceApi::new();
        api.expect_read_l4_port_set_ns_service()
            .returning(|_| Err(Error::NotFound("gone".into())));

        let mut record = record();
        record.id = Some("svc-1".into());
        record.read(&api).await.unwrap();
        assert!(record.id.is_none());
    }

    #[tokio::test]
    async fn update_not_found_is_an_error() {
        let mut api = MockNsServiceApi::new();
        api.expect_update_l4_port_set_ns_service()
            .withf(|id, service| id.as_str() == "svc-1" && service.meta.revision == Some(5))
            .returning(|_, _| Err(Error::NotFound("gone".into())));
        api.expect_read_l4_port_set_ns_service().never();

        let mut record = record();
        record.id = Some("svc-1".into());
        record.revision = 5;
        let err = record.update(&api).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("Error during NsService update"));
    }

    #[tokio::test]
    async fn delete_not_found_clears_id() {
        let mut api = MockNsServiceApi::new();
        api.expect_delete_ns_service()
            .returning(|_| Err(Error::NotFound("gone".into())));

        let mut record = record();
        record.id = Some("svc-1".into());
        record.delete(&api).await.unwrap();
        assert!(record.id.is_none());
    }
}
