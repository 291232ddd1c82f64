//! REST transport over `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::DeviceTransport;
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::types::{DeviceDetail, DevicePayload, DeviceSummary, SearchRequest, SearchResponse};

/// HTTP client for the devfinder backend.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    client: Client,
}

impl HttpTransport {
    /// Create a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Request {
                url: config.base_url.clone(),
                message: format!("HTTP client error: {}", e),
            })?;

        Ok(Self { base_url, client })
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        debug!(%method, %url, "backend request");
        self.client.request(method, url.clone())
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<String, TransportError> {
        let response = request.send().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Http {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, TransportError> {
        let body = self.send(request, url).await?;
        serde_json::from_str(&body).map_err(|e| TransportError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl DeviceTransport for HttpTransport {
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>, TransportError> {
        let url = self.endpoint(&["devices"])?;
        self.send_json(self.request(Method::GET, &url), &url).await
    }

    async fn get_device(&self, id: &str) -> Result<DeviceDetail, TransportError> {
        let url = self.endpoint(&["devices", id])?;
        self.send_json(self.request(Method::GET, &url), &url).await
    }

    async fn create_device(&self, payload: &DevicePayload) -> Result<DeviceDetail, TransportError> {
        let url = self.endpoint(&["devices"])?;
        let request = self.request(Method::POST, &url).json(payload);
        self.send_json(request, &url).await
    }

    async fn update_device(
        &self,
        id: &str,
        payload: &DevicePayload,
    ) -> Result<DeviceDetail, TransportError> {
        let url = self.endpoint(&["devices", id])?;
        let request = self.request(Method::PUT, &url).json(payload);
        self.send_json(request, &url).await
    }

    async fn delete_device(&self, id: &str) -> Result<(), TransportError> {
        let url = self.endpoint(&["devices", id])?;
        self.send(self.request(Method::DELETE, &url), &url).await?;
        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, TransportError> {
        let url = self.endpoint(&["devices", "search"])?;
        let builder = self.request(Method::POST, &url).json(request);
        self.send_json(builder, &url).await
    }

    async fn analytics(&self) -> Result<serde_json::Value, TransportError> {
        let url = self.endpoint(&["admin", "analytics"])?;
        self.send_json(self.request(Method::GET, &url), &url).await
    }
}
