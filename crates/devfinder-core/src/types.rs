//! Type definitions shared by the coordinator and its front ends.
//!
//! Field names follow the backend's camelCase JSON.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One catalog entry as returned by `GET /devices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    /// Opaque backend identifier
    pub id: String,
    pub title: String,
    /// Image URLs, in display order
    #[serde(default)]
    pub images: Vec<String>,
    /// Specification sheet, e.g. `"ram" -> "8 GB"`
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Full device view, optionally carrying the explanation of why a search
/// matched it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetail {
    #[serde(flatten)]
    pub summary: DeviceSummary,
    /// How well the specs fit the requested criteria
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_score: Option<f64>,
    /// Similarity between the criteria and user opinions on the device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opinion_score: Option<f64>,
    /// Per-criterion score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_weights: Option<BTreeMap<String, f64>>,
}

impl DeviceDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    /// Whether the backend attached any match explanation.
    pub fn has_match_explanation(&self) -> bool {
        self.spec_score.is_some()
            || self.opinion_score.is_some()
            || self.score_breakdown.is_some()
            || self.category_weights.is_some()
    }
}

/// Body of `POST /devices` and `PUT /devices/{id}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePayload {
    pub title: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// One turn of the conversational search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriterion {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl SearchCriterion {
    pub fn new(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
        }
    }
}

/// The fixed set of structured search facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SelectorKey {
    Ram,
    Rom,
    Battery,
    Camera,
    Benchmark,
    PriceRange,
}

impl SelectorKey {
    pub const ALL: [SelectorKey; 6] = [
        SelectorKey::Ram,
        SelectorKey::Rom,
        SelectorKey::Battery,
        SelectorKey::Camera,
        SelectorKey::Benchmark,
        SelectorKey::PriceRange,
    ];

    /// Wire name of the selector
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorKey::Ram => "ram",
            SelectorKey::Rom => "rom",
            SelectorKey::Battery => "battery",
            SelectorKey::Camera => "camera",
            SelectorKey::Benchmark => "benchmark",
            SelectorKey::PriceRange => "priceRange",
        }
    }

    /// Parse a wire name. `storage` is accepted as a synonym for `rom`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ram" => Some(SelectorKey::Ram),
            "rom" | "storage" => Some(SelectorKey::Rom),
            "battery" => Some(SelectorKey::Battery),
            "camera" => Some(SelectorKey::Camera),
            "benchmark" => Some(SelectorKey::Benchmark),
            "priceRange" => Some(SelectorKey::PriceRange),
            _ => None,
        }
    }
}

impl fmt::Display for SelectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Selector facets restricted to [`SelectorKey`] with non-empty values.
///
/// Unknown keys and blank or non-string values are dropped on every way in,
/// including deserialization, so they can never be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorFilters(BTreeMap<SelectorKey, String>);

impl SelectorFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a loose JSON value, keeping only known keys with non-empty
    /// trimmed string values.
    pub fn from_value(value: &Value) -> Self {
        let mut filters = Self::new();
        if let Value::Object(map) = value {
            for (key, value) in map {
                if let (Some(key), Some(value)) = (SelectorKey::parse(key), value.as_str()) {
                    filters.insert(key, value);
                }
            }
        }
        filters
    }

    /// Set a facet. Blank values remove it; returns whether a value is now set.
    pub fn insert(&mut self, key: SelectorKey, value: &str) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.0.remove(&key);
            false
        } else {
            self.0.insert(key, trimmed.to_string());
            true
        }
    }

    pub fn get(&self, key: SelectorKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SelectorKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SelectorFilters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SelectorFilters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(SelectorFilters::from_value(&value))
    }
}

/// The conversational search session as held in memory and in tab storage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSession {
    #[serde(default)]
    pub criteria: Vec<SearchCriterion>,
    #[serde(default)]
    pub console_input: String,
    #[serde(default)]
    pub selectors: SelectorFilters,
    /// Token of the last explicit search action; empty until one happens
    #[serde(default)]
    pub request_id: String,
}

impl SearchSession {
    /// Whether a search round has been requested in this tab lifetime.
    pub fn has_active_search(&self) -> bool {
        !self.request_id.is_empty() && !self.criteria.is_empty()
    }
}

/// Body of `POST /devices/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub conversation_history: Vec<SearchCriterion>,
    pub selected_filters: SelectorFilters,
}

impl From<&SearchSession> for SearchRequest {
    fn from(session: &SearchSession) -> Self {
        Self {
            conversation_history: session.criteria.clone(),
            selected_filters: session.selectors.clone(),
        }
    }
}

/// Answer of the search backend: either a follow-up question or results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data")]
pub enum SearchResponse {
    #[serde(rename = "ASK")]
    Ask { text: String },
    #[serde(rename = "RESULT")]
    Result(Vec<DeviceDetail>),
}
