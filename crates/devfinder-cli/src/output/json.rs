//! JSON-formatted output for CLI.

use serde::Serialize;
use serde_json::{json, Value};

use super::OutputFormatter;
use devfinder_core::types::{DeviceDetail, SearchResponse, SearchSession};
use devfinder_core::CatalogSnapshot;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_catalog(&self, catalog: &CatalogSnapshot) -> String {
        Self::to_json(&json!({
            "devices": catalog.devices.as_slice(),
            "count": catalog.devices.len(),
            "isError": catalog.is_error,
            "isStale": catalog.is_stale,
            "fetchedAt": catalog.fetched_at,
        }))
    }

    fn format_detail(&self, detail: &DeviceDetail) -> String {
        Self::to_json(detail)
    }

    fn format_search(&self, response: &SearchResponse) -> String {
        Self::to_json(response)
    }

    fn format_session(&self, session: &SearchSession) -> String {
        Self::to_json(session)
    }

    fn format_value(&self, value: &Value) -> String {
        Self::to_json(value)
    }

    fn format_message(&self, message: &str) -> String {
        Self::to_json(&json!({ "message": message }))
    }
}
