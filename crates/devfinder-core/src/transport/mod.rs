//! Backend transport layer.
//!
//! The coordinator only sees [`DeviceTransport`]; [`HttpTransport`] is the
//! production implementation over the REST API.

pub mod http;

pub use http::HttpTransport;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::{DeviceDetail, DevicePayload, DeviceSummary, SearchRequest, SearchResponse};

/// Calls the coordinator makes against the backend.
///
/// Implementations perform no retries; every call resolves exactly once.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// `GET /devices`
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>, TransportError>;

    /// `GET /devices/{id}`
    async fn get_device(&self, id: &str) -> Result<DeviceDetail, TransportError>;

    /// `POST /devices`
    async fn create_device(&self, payload: &DevicePayload) -> Result<DeviceDetail, TransportError>;

    /// `PUT /devices/{id}`
    async fn update_device(
        &self,
        id: &str,
        payload: &DevicePayload,
    ) -> Result<DeviceDetail, TransportError>;

    /// `DELETE /devices/{id}`
    async fn delete_device(&self, id: &str) -> Result<(), TransportError>;

    /// `POST /devices/search`
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, TransportError>;

    /// `GET /admin/analytics`, passed through untouched.
    async fn analytics(&self) -> Result<serde_json::Value, TransportError>;
}
