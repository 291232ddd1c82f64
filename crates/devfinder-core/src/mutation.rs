//! Admin writes against the catalog.

use std::sync::Arc;

use tracing::info;

use crate::catalog::CatalogCache;
use crate::detail::DetailFetchCoordinator;
use crate::error::TransportError;
use crate::transport::DeviceTransport;
use crate::types::{DeviceDetail, DevicePayload};

/// Writes through to the backend, then to the catalog and the detail slot.
///
/// Nothing local changes when the backend write fails, and errors are
/// returned as the transport produced them.
pub struct MutationGateway {
    transport: Arc<dyn DeviceTransport>,
    catalog: Arc<CatalogCache>,
    details: Arc<DetailFetchCoordinator>,
}

impl MutationGateway {
    pub fn new(
        transport: Arc<dyn DeviceTransport>,
        catalog: Arc<CatalogCache>,
        details: Arc<DetailFetchCoordinator>,
    ) -> Self {
        Self {
            transport,
            catalog,
            details,
        }
    }

    pub async fn create(&self, payload: &DevicePayload) -> Result<DeviceDetail, TransportError> {
        let created = self.transport.create_device(payload).await?;
        info!(id = %created.id(), "device created");
        self.catalog.invalidate();
        Ok(created)
    }

    /// Update a device; a displayed detail for `id` is replaced with the
    /// echoed record instead of being re-fetched.
    pub async fn update(
        &self,
        id: &str,
        payload: &DevicePayload,
    ) -> Result<DeviceDetail, TransportError> {
        let updated = self.transport.update_device(id, payload).await?;
        let replaced = self.details.replace_if_current(id, updated.clone());
        info!(%id, replaced, "device updated");
        self.catalog.invalidate();
        Ok(updated)
    }

    /// Delete a device; a displayed detail for `id` is cleared.
    pub async fn remove(&self, id: &str) -> Result<(), TransportError> {
        self.transport.delete_device(id).await?;
        let cleared = self.details.clear_if_current(id);
        info!(%id, cleared, "device removed");
        self.catalog.invalidate();
        Ok(())
    }
}
