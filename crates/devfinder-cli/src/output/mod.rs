//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use devfinder_core::types::{DeviceDetail, SearchResponse, SearchSession};
use devfinder_core::CatalogSnapshot;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format the catalog listing
    fn format_catalog(&self, catalog: &CatalogSnapshot) -> String;

    /// Format one device with its match explanation
    fn format_detail(&self, detail: &DeviceDetail) -> String;

    /// Format a search answer (follow-up question or results)
    fn format_search(&self, response: &SearchResponse) -> String;

    /// Format the stored search session
    fn format_session(&self, session: &SearchSession) -> String;

    /// Format an opaque JSON payload
    fn format_value(&self, value: &serde_json::Value) -> String;

    /// Format a generic message
    fn format_message(&self, message: &str) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
